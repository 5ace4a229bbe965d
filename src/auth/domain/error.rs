//! Token issuance and verification failures.

use thiserror::Error;

/// Errors returned by the token service.
///
/// Verification only ever yields the first three variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The input is not a structurally valid token (empty, wrong segment
    /// count, bad encoding, or unreadable claims).
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The signature does not match the payload under the configured secret.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// The token was valid once but its expiry has passed.
    #[error("token expired")]
    Expired,

    /// Encoding a freshly issued token failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;
