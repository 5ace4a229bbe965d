//! Wire representation of task lifecycle events.

mod error;
mod event;

pub use error::EventDecodeError;
pub use event::{TaskEvent, TaskEventKind};
