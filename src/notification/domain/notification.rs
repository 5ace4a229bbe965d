//! Rendered user-facing notification.

use crate::event::domain::TaskEventKind;

/// A message rendered for one task event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Kind of the event that triggered the notification.
    pub kind: TaskEventKind,
    /// Task the event describes.
    pub task_id: i64,
    /// Rendered message text.
    pub message: String,
}
