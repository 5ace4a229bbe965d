//! Domain model for tasks and their attachments.
//!
//! Identifiers are assigned by the task store, so unsaved values
//! ([`NewTask`], [`NewAttachment`]) are distinct types from stored ones.

mod attachment;
mod error;
mod ids;
mod task;

pub use attachment::{Attachment, NewAttachment, PersistedAttachmentData};
pub use error::TaskDomainError;
pub use ids::{AttachmentId, TaskId};
pub use task::{NewTask, PersistedTaskData, Task, TaskStatus, TaskTitle, TaskUpdate};
