//! Template-driven notification handler.

use crate::event::domain::{TaskEvent, TaskEventKind};
use crate::notification::{
    domain::Notification,
    ports::{HandlerError, HandlerResult, NotificationSink, TaskEventHandler},
};
use async_trait::async_trait;
use minijinja::Environment;
use std::sync::Arc;

/// Message template for `CREATED` events.
pub const CREATED_TEMPLATE: &str = "New task created: {{ title }}";
/// Message template for `UPDATED` events.
pub const UPDATED_TEMPLATE: &str = "Task updated: {{ title }} ({{ status }})";
/// Message template for `DELETED` events.
pub const DELETED_TEMPLATE: &str = "Task deleted: {{ title }}";

/// Renders a message for each event and hands it to a sink.
///
/// Templates see the event's wire fields: `taskId`, `title`, `description`,
/// `status`, `eventType`, and `timestamp`.
pub struct NotificationHandler<S>
where
    S: NotificationSink,
{
    sink: Arc<S>,
    template: String,
}

impl<S> NotificationHandler<S>
where
    S: NotificationSink,
{
    /// Creates a handler rendering `template`.
    #[must_use]
    pub fn new(sink: Arc<S>, template: impl Into<String>) -> Self {
        Self {
            sink,
            template: template.into(),
        }
    }

    /// Returns the default handler for `kind`, or `None` for kinds without a
    /// default template.
    #[must_use]
    pub fn for_kind(sink: Arc<S>, kind: &TaskEventKind) -> Option<Self> {
        let template = match kind {
            TaskEventKind::Created => CREATED_TEMPLATE,
            TaskEventKind::Updated => UPDATED_TEMPLATE,
            TaskEventKind::Deleted => DELETED_TEMPLATE,
            TaskEventKind::Other(_) => return None,
        };
        Some(Self::new(sink, template))
    }

    fn render(&self, event: &TaskEvent) -> HandlerResult<String> {
        Environment::new()
            .render_str(&self.template, event)
            .map_err(|err| HandlerError::Template {
                kind: event.event_type().clone(),
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl<S> TaskEventHandler for NotificationHandler<S>
where
    S: NotificationSink,
{
    async fn handle(&self, event: &TaskEvent) -> HandlerResult<()> {
        let message = self.render(event)?;
        self.sink
            .deliver(Notification {
                kind: event.event_type().clone(),
                task_id: event.task_id(),
                message,
            })
            .await?;
        Ok(())
    }
}
