//! Process configuration.
//!
//! [`AppConfig`] is assembled once at startup from built-in defaults, an
//! optional configuration file, and `TASKFLOW__*` environment variables, then
//! passed into component constructors. Nothing reads configuration lazily.

use config::{Config, Environment, File, Map};
use serde::Deserialize;
use thiserror::Error;

/// Minimum shared-secret length for HMAC token signing (256 bits).
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

const ENV_PREFIX: &str = "TASKFLOW";
const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialised.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was present but unusable.
    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level process configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Identity token settings.
    pub token: TokenConfig,
    /// Task event topic settings.
    pub events: EventsConfig,
    /// Attachment object-store settings.
    pub storage: StorageConfig,
    /// Task store connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Token signing settings.
#[derive(Clone, Deserialize)]
pub struct TokenConfig {
    /// Symmetric HMAC secret. Must be at least [`MIN_TOKEN_SECRET_BYTES`] long.
    pub secret: String,
    /// Token lifetime in seconds.
    pub lifetime_secs: u64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

/// Event topic settings shared by the publisher and the consumer.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Topic that carries task lifecycle events.
    pub topic: String,
    /// Partition count used when the topic is provisioned.
    pub partitions: u32,
    /// Replication factor used when the topic is provisioned.
    pub replication_factor: u16,
    /// Consumer group used by the notification consumer.
    pub consumer_group: String,
}

/// Attachment storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding attachment objects.
    pub bucket: String,
    /// Lifetime of presigned download URLs, in seconds.
    pub presigned_url_ttl_secs: u64,
}

/// Task store connection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL. The in-memory store is used when unset.
    pub url: Option<String>,
    /// Maximum pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

const fn default_pool_size() -> u32 {
    5
}

/// Output format for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from defaults, an optional file, and the
    /// environment, then validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be read or a
    /// required value (such as the token secret) is missing, and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn load(file: Option<&str>) -> ConfigResult<Self> {
        Self::load_with_env(file, None)
    }

    /// Loads configuration like [`Self::load`], reading variables from
    /// `env` instead of the process environment when it is given.
    ///
    /// Values stay strings until deserialisation, so a secret made only of
    /// digits is never coerced into a number.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_env(
        file: Option<&str>,
        env: Option<Map<String, String>>,
    ) -> ConfigResult<Self> {
        let mut builder = Config::builder()
            .set_default("token.lifetime_secs", 3600)?
            .set_default("events.topic", "task-events")?
            .set_default("events.partitions", 3)?
            .set_default("events.replication_factor", 1)?
            .set_default("events.consumer_group", "notification-group")?
            .set_default("storage.bucket", "task-attachments")?
            .set_default("storage.presigned_url_ttl_secs", 3600)?
            .set_default("logging.filter", "info")?;

        if let Some(path) = file {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field and range constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        self.token.validate()?;
        self.events.validate()?;
        if self.storage.bucket.trim().is_empty() {
            return Err(invalid("storage.bucket", "must not be empty"));
        }
        if self.storage.presigned_url_ttl_secs == 0 {
            return Err(invalid("storage.presigned_url_ttl_secs", "must be positive"));
        }
        Ok(())
    }
}

impl TokenConfig {
    /// Checks secret strength and lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the secret is shorter than
    /// [`MIN_TOKEN_SECRET_BYTES`] or the lifetime is zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.secret.len() < MIN_TOKEN_SECRET_BYTES {
            return Err(invalid(
                "token.secret",
                format!(
                    "must be at least {MIN_TOKEN_SECRET_BYTES} bytes, got {}",
                    self.secret.len()
                ),
            ));
        }
        if self.lifetime_secs == 0 {
            return Err(invalid("token.lifetime_secs", "must be positive"));
        }
        Ok(())
    }
}

impl EventsConfig {
    /// Checks topic naming and sizing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for empty names or zero counts.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.topic.trim().is_empty() {
            return Err(invalid("events.topic", "must not be empty"));
        }
        if self.consumer_group.trim().is_empty() {
            return Err(invalid("events.consumer_group", "must not be empty"));
        }
        if self.partitions == 0 {
            return Err(invalid("events.partitions", "must be positive"));
        }
        if self.replication_factor == 0 {
            return Err(invalid("events.replication_factor", "must be positive"));
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Returns the presigned URL lifetime as a duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the value does not fit a
    /// duration.
    pub fn presigned_url_ttl(&self) -> ConfigResult<chrono::Duration> {
        i64::try_from(self.presigned_url_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                invalid(
                    "storage.presigned_url_ttl_secs",
                    format!("{} seconds is out of range", self.presigned_url_ttl_secs),
                )
            })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
