//! Document store port.
//!
//! A document store holds named collections of schema-less documents keyed
//! by opaque ids the store assigns.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::movie::Fields;

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, Error)]
pub enum DocumentStoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected document store response: {0}")]
    InvalidResponse(String),
}

impl DocumentStoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

/// Port for document persistence.
///
/// # Contract
///
/// - `list_all` returns every document in the collection, in the store's
///   default order
/// - `insert` assigns a fresh id and returns it
/// - `update_fields` overwrites only the given fields and fails with
///   `NotFound` when the document does not exist
/// - `delete` succeeds whether or not the document exists
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, DocumentStoreError>;

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, DocumentStoreError>;

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), DocumentStoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError>;
}
