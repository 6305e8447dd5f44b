//! Blob store port.
//!
//! A hierarchical namespace of named binary objects. Paths use `/` as the
//! separator; listing is one level deep.

use async_trait::async_trait;
use thiserror::Error;

/// A listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Last path segment.
    pub name: String,
    /// Full object path.
    pub path: String,
}

/// Errors that can occur during blob store operations.
#[derive(Debug, Clone, Error)]
pub enum BlobStoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Blob store unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected blob store response: {0}")]
    InvalidResponse(String),
}

/// Port for binary object persistence.
///
/// # Contract
///
/// - `list_under_prefix` returns the objects directly under `prefix`, not
///   those in nested folders
/// - `upload` replaces any existing object at the same path
/// - `resolve_url` and `delete` fail with `NotFound` for missing objects
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn list_under_prefix(&self, prefix: &str) -> Result<Vec<BlobRef>, BlobStoreError>;

    async fn resolve_url(&self, path: &str) -> Result<String, BlobStoreError>;

    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), BlobStoreError>;

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError>;
}
