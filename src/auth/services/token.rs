//! HMAC-SHA256 token issuing and verification.

use crate::auth::domain::{IdentityClaims, TokenError, TokenResult, VerifiedToken};
use crate::config::{ConfigError, ConfigResult, TokenConfig};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Issues and verifies signed identity tokens.
///
/// The service is stateless apart from its keys and clock, so it can be
/// shared freely across threads.
pub struct TokenService<C>
where
    C: Clock,
{
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    clock: Arc<C>,
}

impl<C> Clone for TokenService<C>
where
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            encoding_key: self.encoding_key.clone(),
            decoding_key: self.decoding_key.clone(),
            lifetime: self.lifetime,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> TokenService<C>
where
    C: Clock,
{
    /// Creates a token service from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the secret is shorter than 256
    /// bits or the lifetime is zero or out of range.
    pub fn new(config: &TokenConfig, clock: Arc<C>) -> ConfigResult<Self> {
        config.validate()?;
        let lifetime = i64::try_from(config.lifetime_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| ConfigError::Invalid {
                field: "token.lifetime_secs",
                reason: format!("{} seconds is out of range", config.lifetime_secs),
            })?;

        let secret = config.secret.as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
            clock,
        })
    }

    /// Issues a token for `subject` carrying `capabilities`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if the claims cannot be encoded.
    pub fn issue<I, S>(&self, subject: &str, capabilities: I) -> TokenResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // Claims carry whole seconds; the lifetime runs from that second.
        let issued_at = self.clock.utc().trunc_subsecs(0);
        let expires_at = issued_at + self.lifetime;
        let claims = IdentityClaims {
            sub: subject.to_owned(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenError::Signing(err.to_string()))?;

        debug!(
            subject = %claims.sub,
            capabilities = ?claims.capabilities,
            expires_at = claims.exp,
            "issued identity token"
        );
        Ok(token)
    }

    /// Verifies a token's structure, signature, and expiry.
    ///
    /// The signature is checked before expiry, so a forged token is always
    /// reported as [`TokenError::SignatureInvalid`] even if it is also stale.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MalformedToken`], [`TokenError::SignatureInvalid`],
    /// or [`TokenError::Expired`].
    pub fn verify(&self, token: &str) -> TokenResult<VerifiedToken> {
        if token.trim().is_empty() {
            return Err(TokenError::MalformedToken("token is empty".to_owned()));
        }

        let claims = decode::<IdentityClaims>(token, &self.decoding_key, &Self::validation())
            .map_err(|err| {
                let mapped = classify(err.kind());
                debug!(error = %err, kind = ?mapped, "token verification failed");
                mapped
            })?
            .claims;

        let now = self.clock.utc().timestamp();
        if now >= claims.exp {
            debug!(subject = %claims.sub, expired_at = claims.exp, "token expired");
            return Err(TokenError::Expired);
        }

        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;
        Ok(VerifiedToken::new(
            claims.sub,
            claims.capabilities,
            issued_at,
            expires_at,
        ))
    }

    /// Returns the subject of a token after verifying it.
    ///
    /// There is no unchecked variant: the token is fully verified first and
    /// the same failures as [`Self::verify`] are propagated.
    ///
    /// # Errors
    ///
    /// See [`Self::verify`].
    pub fn extract_subject(&self, token: &str) -> TokenResult<String> {
        self.verify(token).map(VerifiedToken::into_subject)
    }

    /// Returns the configured token lifetime.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::MalformedToken(format!("missing claim '{claim}'"))
        }
        other => TokenError::MalformedToken(format!("{other:?}")),
    }
}

fn timestamp(seconds: i64) -> TokenResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::MalformedToken(format!("timestamp {seconds} out of range")))
}
