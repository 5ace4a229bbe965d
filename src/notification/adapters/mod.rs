//! Notification sink implementations.

mod log;
mod memory;

pub use log::LogNotificationSink;
pub use memory::MemoryNotificationSink;
