//! Port contracts for event handling and notification delivery.

pub mod handler;
pub mod sink;

pub use handler::{HandlerError, HandlerResult, TaskEventHandler};
pub use sink::{NotificationSink, SinkError, SinkResult};
