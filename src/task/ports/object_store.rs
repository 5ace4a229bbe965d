//! Object storage port for attachment payloads.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use thiserror::Error;

/// Result type for object store operations.
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Blob storage keyed by opaque strings.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `bytes` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> ObjectStoreResult<()>;

    /// Reads the object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::NotFound`] when nothing is stored there.
    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>>;

    /// Removes the object under `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> ObjectStoreResult<()>;

    /// Returns whether an object exists under `key`.
    async fn exists(&self, key: &str) -> ObjectStoreResult<bool>;

    /// Returns a time-limited download URL for `key`.
    async fn presigned_url(&self, key: &str, ttl: Duration) -> ObjectStoreResult<String>;
}

/// Errors returned by object store adapters.
#[derive(Debug, Clone, Error)]
pub enum ObjectStoreError {
    /// No object is stored under the key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Transport or backend failure.
    #[error("object store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl ObjectStoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
