//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task status label is empty after trimming.
    #[error("task status must not be empty")]
    EmptyStatus,

    /// A task identifier was zero or negative.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// An attachment identifier was zero or negative.
    #[error("invalid attachment identifier {0}, expected a positive integer")]
    InvalidAttachmentId(i64),

    /// An attachment was uploaded without a file name.
    #[error("attachment file name must not be empty")]
    EmptyFileName,
}
