//! Dispatch, rendering, and the receive loop.

mod consumer;
mod dispatcher;
mod notifier;

pub use consumer::{ConsumerError, ConsumerReport, ConsumerResult, NotificationConsumer};
pub use dispatcher::TaskEventDispatcher;
pub use notifier::{CREATED_TEMPLATE, DELETED_TEMPLATE, NotificationHandler, UPDATED_TEMPLATE};
