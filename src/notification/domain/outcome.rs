//! Terminal states of a single consumed message.

use crate::event::domain::TaskEventKind;

/// How a consumed message ended.
///
/// Every variant is terminal and leads to acknowledgement; none triggers a
/// retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The payload was not a task event.
    ParseFailed,
    /// No handler is registered for the kind.
    Unhandled(TaskEventKind),
    /// The handler completed.
    Handled(TaskEventKind),
    /// The handler returned an error or panicked.
    HandlerFailed(TaskEventKind),
}

impl DispatchOutcome {
    /// Returns `true` when a handler ran to completion.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}
