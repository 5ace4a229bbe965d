//! Application services for emitting task events.

mod publisher;

pub use publisher::{PublishError, PublishResult, TaskEventPublisher};
