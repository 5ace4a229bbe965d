//! Per-kind task event handler contract.

use super::SinkError;
use crate::event::domain::{TaskEvent, TaskEventKind};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for event handlers.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Side effect run for one kind of task event.
///
/// A failure is logged by the dispatcher and never reaches the broker, so
/// handlers should not rely on redelivery.
#[async_trait]
pub trait TaskEventHandler: Send + Sync {
    /// Handles one decoded event.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the side effect could not be applied.
    async fn handle(&self, event: &TaskEvent) -> HandlerResult<()>;
}

/// Errors returned by event handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The notification template could not be rendered.
    #[error("failed to render {kind} notification: {reason}")]
    Template {
        /// Kind being rendered.
        kind: TaskEventKind,
        /// Renderer message.
        reason: String,
    },

    /// The notification could not be delivered.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Any other handler failure.
    #[error("handler failed: {0}")]
    Failed(String),
}
