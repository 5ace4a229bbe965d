//! `PostgreSQL` repository implementation for attachment metadata.

use super::{
    models::{AttachmentRow, NewAttachmentRow},
    repository::TaskPgPool,
    schema::task_attachments,
};
use crate::task::{
    domain::{Attachment, AttachmentId, NewAttachment, TaskId},
    ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed attachment metadata repository.
#[derive(Debug, Clone)]
pub struct PostgresAttachmentRepository {
    pool: TaskPgPool,
}

impl PostgresAttachmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AttachmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AttachmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AttachmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AttachmentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AttachmentRepository for PostgresAttachmentRepository {
    async fn insert(&self, attachment: &NewAttachment) -> AttachmentRepositoryResult<Attachment> {
        let new_row =
            NewAttachmentRow::try_from(attachment).map_err(AttachmentRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(task_attachments::table)
                .values(&new_row)
                .returning(AttachmentRow::as_returning())
                .get_result::<AttachmentRow>(connection)
                .map_err(AttachmentRepositoryError::persistence)?;
            row_to_attachment(row)
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: AttachmentId,
    ) -> AttachmentRepositoryResult<Option<Attachment>> {
        self.run_blocking(move |connection| {
            let row = task_attachments::table
                .find(id.value())
                .select(AttachmentRow::as_select())
                .first::<AttachmentRow>(connection)
                .optional()
                .map_err(AttachmentRepositoryError::persistence)?;
            row.map(row_to_attachment).transpose()
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> AttachmentRepositoryResult<Vec<Attachment>> {
        self.run_blocking(move |connection| {
            let rows = task_attachments::table
                .filter(task_attachments::task_id.eq(task_id.value()))
                .order(task_attachments::id.asc())
                .select(AttachmentRow::as_select())
                .load::<AttachmentRow>(connection)
                .map_err(AttachmentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_attachment).collect()
        })
        .await
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(task_attachments::table.find(id.value()))
                .execute(connection)
                .map_err(AttachmentRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }
}

fn row_to_attachment(row: AttachmentRow) -> AttachmentRepositoryResult<Attachment> {
    Attachment::try_from(row).map_err(AttachmentRepositoryError::persistence)
}
