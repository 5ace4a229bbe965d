//! Sink that writes notifications to the structured log.

use crate::notification::{
    domain::Notification,
    ports::{NotificationSink, SinkResult},
};
use async_trait::async_trait;
use tracing::info;

/// Sink emitting one `info` event per notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn deliver(&self, notification: Notification) -> SinkResult<()> {
        info!(
            task_id = notification.task_id,
            event_type = %notification.kind,
            message = %notification.message,
            "notification"
        );
        Ok(())
    }
}
