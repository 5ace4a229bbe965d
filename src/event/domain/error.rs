//! Error types for decoding task events.

use thiserror::Error;

/// A consumed payload that is not a valid task event.
#[derive(Debug, Error)]
pub enum EventDecodeError {
    /// The payload is not JSON, or lacks a required field.
    #[error("malformed task event payload: {0}")]
    Payload(#[from] serde_json::Error),
}
