//! Attachment metadata stored alongside tasks.

use super::{AttachmentId, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attachment metadata before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    task_id: TaskId,
    storage_key: String,
    original_filename: String,
    content_type: Option<String>,
    size: u64,
    uploaded_at: DateTime<Utc>,
}

impl NewAttachment {
    /// Describes an upload for `task_id`, generating a unique storage key of
    /// the form `{task_id}_{uuid}_{filename}`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyFileName`] when `original_filename` is
    /// blank.
    pub fn new(
        task_id: TaskId,
        original_filename: impl Into<String>,
        content_type: Option<String>,
        size: u64,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw_filename = original_filename.into();
        let trimmed = raw_filename.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyFileName);
        }
        let storage_key = format!("{task_id}_{}_{trimmed}", Uuid::new_v4());
        Ok(Self {
            task_id,
            storage_key,
            original_filename: trimmed.to_owned(),
            content_type,
            size,
            uploaded_at: clock.utc(),
        })
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the object-store key.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the file name supplied by the uploader.
    #[must_use]
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Returns the declared content type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_attachment(self, id: AttachmentId) -> Attachment {
        Attachment {
            id,
            task_id: self.task_id,
            storage_key: self.storage_key,
            original_filename: self.original_filename,
            content_type: self.content_type,
            size: self.size,
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Stored attachment metadata.
///
/// Many attachments may reference one task. Deleting the task leaves them in
/// place; removal is an explicit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: AttachmentId,
    task_id: TaskId,
    storage_key: String,
    original_filename: String,
    content_type: Option<String>,
    size: u64,
    uploaded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing persisted attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttachmentData {
    /// Persisted identifier.
    pub id: AttachmentId,
    /// Owning task.
    pub task_id: TaskId,
    /// Object-store key.
    pub storage_key: String,
    /// Uploader-supplied file name.
    pub original_filename: String,
    /// Declared content type.
    pub content_type: Option<String>,
    /// Payload size in bytes.
    pub size: u64,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

impl Attachment {
    /// Reconstructs attachment metadata from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttachmentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            storage_key: data.storage_key,
            original_filename: data.original_filename,
            content_type: data.content_type,
            size: data.size,
            uploaded_at: data.uploaded_at,
        }
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the object-store key.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the file name supplied by the uploader.
    #[must_use]
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Returns the declared content type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}
