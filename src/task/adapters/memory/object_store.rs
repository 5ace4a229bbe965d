//! In-memory object store.

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::ports::{ObjectStore, ObjectStoreError, ObjectStoreResult};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Object store backed by a single in-process bucket.
///
/// Presigned URLs use the `memory://` scheme and embed the expiry instant;
/// they are only meaningful to tests and local tooling.
pub struct InMemoryObjectStore<C>
where
    C: Clock,
{
    bucket: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    clock: Arc<C>,
}

impl<C> InMemoryObjectStore<C>
where
    C: Clock,
{
    /// Creates an empty bucket named `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>, clock: Arc<C>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Returns the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the stored content type for `key`, if the object exists.
    #[must_use]
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .ok()
            .and_then(|objects| objects.get(key).and_then(|object| object.content_type.clone()))
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().map_or(0, |objects| objects.len())
    }

    /// Returns `true` when the bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(err: impl ToString) -> ObjectStoreError {
    ObjectStoreError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<C> ObjectStore for InMemoryObjectStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> ObjectStoreResult<()> {
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects.insert(
            key.to_owned(),
            StoredObject {
                bytes,
                content_type: content_type.map(str::to_owned),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>> {
        let objects = self.objects.read().map_err(lock_error)?;
        objects
            .get(key)
            .map(|object| object.bytes.clone())
            .ok_or_else(|| ObjectStoreError::NotFound(key.to_owned()))
    }

    async fn remove(&self, key: &str) -> ObjectStoreResult<()> {
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> ObjectStoreResult<bool> {
        let objects = self.objects.read().map_err(lock_error)?;
        Ok(objects.contains_key(key))
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> ObjectStoreResult<String> {
        if !self.exists(key).await? {
            return Err(ObjectStoreError::NotFound(key.to_owned()));
        }
        let expires = (self.clock.utc() + ttl).timestamp();
        Ok(format!("memory://{}/{key}?expires={expires}", self.bucket))
    }
}
