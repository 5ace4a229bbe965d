//! Values produced while consuming task events.

mod notification;
mod outcome;

pub use notification::Notification;
pub use outcome::DispatchOutcome;
