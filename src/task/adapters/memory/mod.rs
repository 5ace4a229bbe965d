//! In-memory adapters for tests and single-process deployments.

mod attachment;
mod object_store;
mod task;

pub use attachment::InMemoryAttachmentRepository;
pub use object_store::InMemoryObjectStore;
pub use task::InMemoryTaskRepository;
