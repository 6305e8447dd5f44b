//! In-memory blob store.
//!
//! Objects are kept in an ordered map keyed by full path. Each upload mints
//! a new access token, so a download URL resolved before an overwrite stops
//! matching the object afterwards.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock as StdRwLock};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::file::object_name;
use crate::ports::{BlobRef, BlobStore, BlobStoreError};

const DEFAULT_BASE_URL: &str = "memory://blobs";

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: Option<String>,
    token: String,
}

/// In-memory storage for binary objects
#[derive(Debug, Clone)]
pub struct InMemoryBlobStore {
    base_url: String,
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
    unresolvable: Arc<StdRwLock<HashSet<String>>>,
    force_error: Arc<StdRwLock<Option<BlobStoreError>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryBlobStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            unresolvable: Arc::new(StdRwLock::new(HashSet::new())),
            force_error: Arc::new(StdRwLock::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the base URL download links are built from.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Makes URL resolution for `path` fail while the object still lists.
    pub fn fail_resolve_for(&self, path: impl Into<String>) {
        self.unresolvable
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into());
    }

    /// Forces all operations to return the specified error.
    pub fn fail_with(&self, error: BlobStoreError) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Clears forced errors, including unresolvable paths.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.unresolvable
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of operations received, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored objects across all prefixes.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Reads an object's bytes and content type directly.
    pub async fn get(&self, path: &str) -> Option<(Vec<u8>, Option<String>)> {
        self.objects
            .read()
            .await
            .get(path)
            .map(|o| (o.bytes.clone(), o.content_type.clone()))
    }

    fn begin_call(&self) -> Result<(), BlobStoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn list_under_prefix(&self, prefix: &str) -> Result<Vec<BlobRef>, BlobStoreError> {
        self.begin_call()?;

        let folder = format!("{}/", prefix.trim_end_matches('/'));
        let objects = self.objects.read().await;
        Ok(objects
            .keys()
            .filter(|path| {
                path.strip_prefix(&folder)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .map(|path| BlobRef {
                name: object_name(path).to_string(),
                path: path.clone(),
            })
            .collect())
    }

    async fn resolve_url(&self, path: &str) -> Result<String, BlobStoreError> {
        self.begin_call()?;

        if self
            .unresolvable
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
        {
            return Err(BlobStoreError::Unavailable(format!(
                "cannot resolve download URL for {}",
                path
            )));
        }

        let objects = self.objects.read().await;
        let object = objects
            .get(path)
            .ok_or_else(|| BlobStoreError::NotFound(path.to_string()))?;
        Ok(format!("{}/{}?token={}", self.base_url, path, object.token))
    }

    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), BlobStoreError> {
        self.begin_call()?;

        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.map(str::to_string),
                token: Uuid::new_v4().to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        self.begin_call()?;

        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::NotFound(path.to_string()))
    }
}
