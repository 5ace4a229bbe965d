//! Notification delivery contract.

use crate::notification::domain::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for rendered notifications: email, push, chat, or a log.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the destination rejects it.
    async fn deliver(&self, notification: Notification) -> SinkResult<()>;
}

/// Errors returned by sink adapters.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The destination is unreachable or refused the notification.
    #[error("notification sink unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl SinkError {
    /// Wraps a delivery error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
