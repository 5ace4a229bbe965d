//! In-memory attachment metadata repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Attachment, AttachmentId, NewAttachment, TaskId},
    ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
};

/// Thread-safe in-memory attachment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttachmentRepository {
    state: Arc<RwLock<InMemoryAttachmentState>>,
}

#[derive(Debug, Default)]
struct InMemoryAttachmentState {
    attachments: BTreeMap<AttachmentId, Attachment>,
    last_id: i64,
}

impl InMemoryAttachmentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> AttachmentRepositoryError {
    AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AttachmentRepository for InMemoryAttachmentRepository {
    async fn insert(&self, attachment: &NewAttachment) -> AttachmentRepositoryResult<Attachment> {
        let mut state = self.state.write().map_err(lock_error)?;
        let next = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| lock_error("attachment identifier sequence exhausted"))?;
        let id = AttachmentId::new(next).map_err(AttachmentRepositoryError::persistence)?;
        let stored = attachment.clone().into_attachment(id);
        state.last_id = next;
        state.attachments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: AttachmentId,
    ) -> AttachmentRepositoryResult<Option<Attachment>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.attachments.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> AttachmentRepositoryResult<Vec<Attachment>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .attachments
            .values()
            .filter(|attachment| attachment.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state.attachments.remove(&id).is_some())
    }
}
