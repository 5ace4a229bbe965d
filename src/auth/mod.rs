//! Identity token issuance and verification.
//!
//! Tokens are compact three-segment HMAC-SHA256 signed credentials carrying a
//! subject and its granted capabilities. They are stateless: nothing is
//! stored, and expiry is the only way a token stops being valid.
//!
//! - Claims and error types in [`domain`]
//! - Issuing and verifying in [`services`]

pub mod domain;
pub mod services;
