//! Domain model for identity tokens.

mod claims;
mod error;

pub use claims::{IdentityClaims, VerifiedToken};
pub use error::{TokenError, TokenResult};
