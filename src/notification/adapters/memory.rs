//! Sink that keeps every notification in memory.

use crate::notification::{
    domain::Notification,
    ports::{NotificationSink, SinkError, SinkResult},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Thread-safe collecting sink.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationSink {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotificationSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything delivered so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .map(|delivered| delivered.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSink for MemoryNotificationSink {
    async fn deliver(&self, notification: Notification) -> SinkResult<()> {
        let mut delivered = self
            .delivered
            .lock()
            .map_err(|err| SinkError::unavailable(std::io::Error::other(err.to_string())))?;
        delivered.push(notification);
        Ok(())
    }
}
