//! `PostgreSQL` adapters for the task store.

mod attachment;
mod models;
mod repository;
mod schema;

pub use attachment::PostgresAttachmentRepository;
pub use repository::{PostgresTaskRepository, TaskPgPool, build_pool};
