//! Repository port for attachment metadata.

use crate::task::domain::{Attachment, AttachmentId, NewAttachment, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for attachment repository operations.
pub type AttachmentRepositoryResult<T> = Result<T, AttachmentRepositoryError>;

/// Attachment metadata persistence contract.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Stores metadata and returns it with its assigned identifier.
    async fn insert(&self, attachment: &NewAttachment) -> AttachmentRepositoryResult<Attachment>;

    /// Finds metadata by identifier.
    async fn find_by_id(
        &self,
        id: AttachmentId,
    ) -> AttachmentRepositoryResult<Option<Attachment>>;

    /// Returns all metadata for a task ordered by identifier.
    async fn find_by_task(&self, task_id: TaskId) -> AttachmentRepositoryResult<Vec<Attachment>>;

    /// Removes metadata, returning whether a row existed.
    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<bool>;
}

/// Errors returned by attachment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AttachmentRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
