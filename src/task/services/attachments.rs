//! Attachment upload, retrieval, and removal.

use crate::task::{
    domain::{Attachment, AttachmentId, NewAttachment, TaskDomainError, TaskId},
    ports::{
        AttachmentRepository, AttachmentRepositoryError, ObjectStore, ObjectStoreError,
        TaskRepository, TaskRepositoryError,
    },
};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for attachment operations.
#[derive(Debug, Error)]
pub enum AttachmentServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The owning task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// No attachment with this identifier belongs to the task.
    #[error("attachment {attachment_id} not found for task {task_id}")]
    AttachmentNotFound {
        /// Task the caller named.
        task_id: TaskId,
        /// Attachment the caller named.
        attachment_id: AttachmentId,
    },
    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Metadata persistence failed.
    #[error(transparent)]
    Metadata(#[from] AttachmentRepositoryError),
    /// Object storage failed.
    #[error(transparent)]
    Storage(#[from] ObjectStoreError),
}

/// Result type for attachment service operations.
pub type AttachmentServiceResult<T> = Result<T, AttachmentServiceError>;

/// Attachment metadata with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDownload {
    /// Stored metadata.
    pub attachment: Attachment,
    /// Object bytes.
    pub bytes: Vec<u8>,
}

/// Attachment orchestration over the task store and an object store.
pub struct AttachmentService<T, A, O, C>
where
    T: TaskRepository,
    A: AttachmentRepository,
    O: ObjectStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    attachments: Arc<A>,
    objects: Arc<O>,
    clock: Arc<C>,
    presigned_ttl: Duration,
}

impl<T, A, O, C> AttachmentService<T, A, O, C>
where
    T: TaskRepository,
    A: AttachmentRepository,
    O: ObjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a new attachment service issuing presigned URLs valid for
    /// `presigned_ttl`.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        attachments: Arc<A>,
        objects: Arc<O>,
        clock: Arc<C>,
        presigned_ttl: Duration,
    ) -> Self {
        Self {
            tasks,
            attachments,
            objects,
            clock,
            presigned_ttl,
        }
    }

    /// Stores `bytes` for an existing task and records its metadata.
    ///
    /// The object is written first. If recording the metadata then fails,
    /// the object is removed again so no orphan remains.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::TaskNotFound`] when the task does
    /// not exist, or the underlying storage error.
    pub async fn upload(
        &self,
        task_id: TaskId,
        filename: &str,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> AttachmentServiceResult<Attachment> {
        if self.tasks.find_by_id(task_id).await?.is_none() {
            return Err(AttachmentServiceError::TaskNotFound(task_id));
        }
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        let pending = NewAttachment::new(task_id, filename, content_type, size, &*self.clock)?;
        self.objects
            .put(pending.storage_key(), bytes, pending.content_type())
            .await?;
        match self.attachments.insert(&pending).await {
            Ok(stored) => {
                info!(
                    task_id = task_id.value(),
                    attachment_id = stored.id().value(),
                    size,
                    "attachment uploaded"
                );
                Ok(stored)
            }
            Err(err) => {
                if let Err(cleanup) = self.objects.remove(pending.storage_key()).await {
                    warn!(
                        storage_key = pending.storage_key(),
                        error = %cleanup,
                        "failed to remove object after metadata insert failed"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Lists the attachments of a task.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::Metadata`] when lookup fails.
    pub async fn list(&self, task_id: TaskId) -> AttachmentServiceResult<Vec<Attachment>> {
        Ok(self.attachments.find_by_task(task_id).await?)
    }

    /// Returns an attachment's metadata and bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::AttachmentNotFound`] when the
    /// attachment does not belong to `task_id`.
    pub async fn download(
        &self,
        task_id: TaskId,
        attachment_id: AttachmentId,
    ) -> AttachmentServiceResult<AttachmentDownload> {
        let attachment = self.owned(task_id, attachment_id).await?;
        let bytes = self.objects.get(attachment.storage_key()).await?;
        Ok(AttachmentDownload { attachment, bytes })
    }

    /// Returns a time-limited download URL for an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::AttachmentNotFound`] when the
    /// attachment does not belong to `task_id`.
    pub async fn presigned_url(
        &self,
        task_id: TaskId,
        attachment_id: AttachmentId,
    ) -> AttachmentServiceResult<String> {
        let attachment = self.owned(task_id, attachment_id).await?;
        Ok(self
            .objects
            .presigned_url(attachment.storage_key(), self.presigned_ttl)
            .await?)
    }

    /// Removes an attachment's object and then its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::AttachmentNotFound`] when the
    /// attachment does not belong to `task_id`.
    pub async fn delete(
        &self,
        task_id: TaskId,
        attachment_id: AttachmentId,
    ) -> AttachmentServiceResult<()> {
        let attachment = self.owned(task_id, attachment_id).await?;
        self.objects.remove(attachment.storage_key()).await?;
        self.attachments.delete(attachment_id).await?;
        info!(
            task_id = task_id.value(),
            attachment_id = attachment_id.value(),
            "attachment deleted"
        );
        Ok(())
    }

    /// Removes every attachment of a task and returns how many were removed.
    ///
    /// Task deletion does not call this; retention is the caller's decision.
    ///
    /// # Errors
    ///
    /// Returns the first storage or metadata error. Attachments removed
    /// before the failure stay removed.
    pub async fn purge_task(&self, task_id: TaskId) -> AttachmentServiceResult<usize> {
        let attachments = self.attachments.find_by_task(task_id).await?;
        let mut removed = 0_usize;
        for attachment in attachments {
            self.objects.remove(attachment.storage_key()).await?;
            if self.attachments.delete(attachment.id()).await? {
                removed = removed.saturating_add(1);
            }
        }
        info!(task_id = task_id.value(), removed, "task attachments purged");
        Ok(removed)
    }

    async fn owned(
        &self,
        task_id: TaskId,
        attachment_id: AttachmentId,
    ) -> AttachmentServiceResult<Attachment> {
        self.attachments
            .find_by_id(attachment_id)
            .await?
            .filter(|attachment| attachment.task_id() == task_id)
            .ok_or(AttachmentServiceError::AttachmentNotFound {
                task_id,
                attachment_id,
            })
    }
}
