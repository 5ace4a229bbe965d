//! Port contracts for the task store.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod attachment;
pub mod object_store;
pub mod repository;

pub use attachment::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult};
pub use object_store::{ObjectStore, ObjectStoreError, ObjectStoreResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
