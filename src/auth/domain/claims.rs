//! Token payload and the verified view handed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Signed token payload.
///
/// `iat` and `exp` are Unix timestamps in seconds, matching the registered
/// JWT claim names so any standard verifier can read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (user identity).
    pub sub: String,
    /// Granted capability labels, e.g. `ROLE_USER`.
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Issued-at time.
    pub iat: i64,
    /// Expiry time. The token is valid strictly before this instant.
    pub exp: i64,
}

/// Identity established by a successful verification.
///
/// Only [`crate::auth::services::TokenService::verify`] produces values of
/// this type, so holding one is proof the signature and expiry were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    subject: String,
    capabilities: BTreeSet<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl VerifiedToken {
    pub(crate) const fn new(
        subject: String,
        capabilities: BTreeSet<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            capabilities,
            issued_at,
            expires_at,
        }
    }

    /// Returns the authenticated subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the granted capability labels.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Returns `true` when `capability` was granted.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Returns when the token was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Returns when the token stops being valid.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Consumes the verified token, returning the subject.
    #[must_use]
    pub fn into_subject(self) -> String {
        self.subject
    }
}
