//! Application services for task mutation and attachment handling.

mod attachments;
mod lifecycle;

pub use attachments::{
    AttachmentDownload, AttachmentService, AttachmentServiceError, AttachmentServiceResult,
};
pub use lifecycle::{
    Committed, NewTaskRequest, Publication, TaskService, TaskServiceError, TaskServiceResult,
    UpdateTaskRequest,
};
