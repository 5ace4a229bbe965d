//! Diesel row models and domain conversions for the task store.

use super::schema::{task_attachments, tasks};
use crate::task::domain::{
    Attachment, AttachmentId, NewAttachment, NewTask, PersistedAttachmentData, PersistedTaskData,
    Task, TaskDomainError, TaskId, TaskStatus, TaskTitle,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use thiserror::Error;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Store-assigned identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Status label.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Status label.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, equal to `created_at` on insert.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by task updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Title.
    pub title: String,
    /// Description; `None` clears the column.
    pub description: Option<String>,
    /// Status label.
    pub status: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for attachment metadata.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttachmentRow {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning task identifier.
    pub task_id: i64,
    /// Object-store key.
    pub storage_key: String,
    /// Uploader-supplied file name.
    pub original_filename: String,
    /// Declared content type.
    pub content_type: Option<String>,
    /// Payload size in bytes.
    pub file_size: i64,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Insert model for attachment metadata.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_attachments)]
pub struct NewAttachmentRow {
    /// Owning task identifier.
    pub task_id: i64,
    /// Object-store key.
    pub storage_key: String,
    /// Uploader-supplied file name.
    pub original_filename: String,
    /// Declared content type.
    pub content_type: Option<String>,
    /// Payload size in bytes.
    pub file_size: i64,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// A stored row that no longer satisfies domain invariants.
#[derive(Debug, Error)]
pub enum RowConversionError {
    /// A column failed domain validation.
    #[error("invalid stored value: {0}")]
    Domain(#[from] TaskDomainError),
    /// A size column does not fit the domain type.
    #[error("stored size {0} is out of range")]
    Size(i64),
}

impl From<&NewTask> for NewTaskRow {
    fn from(task: &NewTask) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            created_at: task.created_at(),
            updated_at: task.created_at(),
        }
    }
}

impl From<&Task> for TaskChangeset {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            updated_at: task.updated_at(),
        }
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = RowConversionError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self::from_persisted(PersistedTaskData {
            id: TaskId::new(row.id)?,
            title: TaskTitle::new(row.title)?,
            description: row.description,
            status: TaskStatus::new(row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

impl TryFrom<&NewAttachment> for NewAttachmentRow {
    type Error = RowConversionError;

    fn try_from(attachment: &NewAttachment) -> Result<Self, Self::Error> {
        let file_size = i64::try_from(attachment.size())
            .map_err(|_| RowConversionError::Size(i64::MAX))?;
        Ok(Self {
            task_id: attachment.task_id().value(),
            storage_key: attachment.storage_key().to_owned(),
            original_filename: attachment.original_filename().to_owned(),
            content_type: attachment.content_type().map(str::to_owned),
            file_size,
            uploaded_at: attachment.uploaded_at(),
        })
    }
}

impl TryFrom<AttachmentRow> for Attachment {
    type Error = RowConversionError;

    fn try_from(row: AttachmentRow) -> Result<Self, Self::Error> {
        let size =
            u64::try_from(row.file_size).map_err(|_| RowConversionError::Size(row.file_size))?;
        Ok(Self::from_persisted(PersistedAttachmentData {
            id: AttachmentId::new(row.id)?,
            task_id: TaskId::new(row.task_id)?,
            storage_key: row.storage_key,
            original_filename: row.original_filename,
            content_type: row.content_type,
            size,
            uploaded_at: row.uploaded_at,
        }))
    }
}
