//! Routing of consumed payloads to per-kind handlers.

use super::NotificationHandler;
use crate::event::domain::{TaskEvent, TaskEventKind};
use crate::notification::{
    domain::DispatchOutcome,
    ports::{NotificationSink, TaskEventHandler},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Routes task events to the handler registered for their kind.
///
/// Dispatch never fails: parse errors, unknown kinds, handler errors, and
/// handler panics all end in a logged [`DispatchOutcome`].
#[derive(Clone, Default)]
pub struct TaskEventDispatcher {
    handlers: HashMap<TaskEventKind, Arc<dyn TaskEventHandler>>,
}

impl std::fmt::Debug for TaskEventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().map(TaskEventKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("TaskEventDispatcher")
            .field("kinds", &kinds)
            .finish()
    }
}

impl TaskEventDispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher with the default notification handler for each
    /// of `CREATED`, `UPDATED`, and `DELETED`, all delivering to `sink`.
    #[must_use]
    pub fn with_notifications<S>(sink: Arc<S>) -> Self
    where
        S: NotificationSink + 'static,
    {
        [
            TaskEventKind::Created,
            TaskEventKind::Updated,
            TaskEventKind::Deleted,
        ]
        .into_iter()
        .fold(Self::new(), |dispatcher, kind| {
            match NotificationHandler::for_kind(Arc::clone(&sink), &kind) {
                Some(handler) => dispatcher.register(kind, Arc::new(handler)),
                None => dispatcher,
            }
        })
    }

    /// Registers `handler` for `kind`, replacing any earlier registration.
    #[must_use]
    pub fn register(mut self, kind: TaskEventKind, handler: Arc<dyn TaskEventHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Returns `true` when a handler is registered for `kind`.
    #[must_use]
    pub fn handles(&self, kind: &TaskEventKind) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Decodes `payload` and dispatches the event.
    #[must_use]
    pub async fn dispatch(&self, payload: &[u8]) -> DispatchOutcome {
        match TaskEvent::decode(payload) {
            Ok(event) => self.dispatch_event(event).await,
            Err(err) => {
                warn!(error = %err, bytes = payload.len(), "dropping malformed task event");
                DispatchOutcome::ParseFailed
            }
        }
    }

    /// Runs the handler registered for the event's kind.
    ///
    /// The handler runs on its own task so that a panic is contained and
    /// reported as [`DispatchOutcome::HandlerFailed`].
    #[must_use]
    pub async fn dispatch_event(&self, event: TaskEvent) -> DispatchOutcome {
        let kind = event.event_type().clone();
        let task_id = event.task_id();
        let Some(handler) = self.handlers.get(&kind).map(Arc::clone) else {
            warn!(task_id, event_type = %kind, "no handler for task event kind, ignoring");
            return DispatchOutcome::Unhandled(kind);
        };
        let joined = tokio::spawn(async move { handler.handle(&event).await }).await;
        match joined {
            Ok(Ok(())) => {
                debug!(task_id, event_type = %kind, "task event handled");
                DispatchOutcome::Handled(kind)
            }
            Ok(Err(err)) => {
                error!(task_id, event_type = %kind, error = %err, "task event handler failed");
                DispatchOutcome::HandlerFailed(kind)
            }
            Err(join_err) => {
                error!(
                    task_id,
                    event_type = %kind,
                    panicked = join_err.is_panic(),
                    "task event handler aborted"
                );
                DispatchOutcome::HandlerFailed(kind)
            }
        }
    }
}
