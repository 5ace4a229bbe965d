//! Consumer side of the task event stream.
//!
//! [`services::NotificationConsumer`] runs an explicit receive loop over an
//! [`crate::event::ports::EventSource`] subscription and hands each payload
//! to a [`services::TaskEventDispatcher`], which routes by event kind.
//! Every message is acknowledged whatever its outcome: malformed payloads,
//! unknown kinds, and failing handlers are logged and dropped.
//!
//! - Notifications and dispatch outcomes in [`domain`]
//! - Handler and sink contracts in [`ports`]
//! - Sink implementations in [`adapters`]
//! - Dispatcher, template handler, and receive loop in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
