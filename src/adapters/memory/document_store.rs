//! In-memory document store.
//!
//! Collections are ordered maps keyed by document id, so listings come back
//! in id order the way the managed store's default ordering does.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock as StdRwLock};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::movie::Fields;
use crate::ports::{Document, DocumentStore, DocumentStoreError};

/// Length of generated document ids.
const AUTO_ID_LEN: usize = 20;

/// In-memory storage for document collections
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, BTreeMap<String, Fields>>>>,
    force_error: Arc<StdRwLock<Option<DocumentStoreError>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces all operations to return the specified error.
    pub fn fail_with(&self, error: DocumentStoreError) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of operations received, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Reads a document directly, bypassing the call counter.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Fields> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    fn begin_call(&self) -> Result<(), DocumentStoreError> {
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

fn auto_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(AUTO_ID_LEN);
    id
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, DocumentStoreError> {
        self.begin_call()?;

        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, DocumentStoreError> {
        self.begin_call()?;

        let id = auto_id();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        self.begin_call()?;

        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| DocumentStoreError::not_found(collection, id))?;
        for (key, value) in fields {
            existing.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        self.begin_call()?;

        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn insert_assigns_unique_ids() {
        let store = InMemoryDocumentStore::new();

        let a = store.insert("movies", Fields::new()).await.unwrap();
        let b = store.insert("movies", Fields::new()).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(a.len(), AUTO_ID_LEN);
        assert_eq!(store.document_count("movies").await, 2);
    }

    #[tokio::test]
    async fn list_all_of_unknown_collection_is_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.list_all("movies").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_fields_merges_into_existing_document() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert("movies", fields(json!({ "title": "A", "releaseDate": 1 })))
            .await
            .unwrap();

        store
            .update_fields("movies", &id, fields(json!({ "title": "B" })))
            .await
            .unwrap();

        let stored = store.get("movies", &id).await.unwrap();
        assert_eq!(Value::Object(stored), json!({ "title": "B", "releaseDate": 1 }));
    }

    #[tokio::test]
    async fn update_fields_on_missing_document_is_not_found() {
        let store = InMemoryDocumentStore::new();

        let result = store
            .update_fields("movies", "nope", fields(json!({ "title": "B" })))
            .await;

        assert!(matches!(result, Err(DocumentStoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_of_missing_document_succeeds() {
        let store = InMemoryDocumentStore::new();
        assert!(store.delete("movies", "nope").await.is_ok());
    }

    #[tokio::test]
    async fn forced_error_fails_every_call_and_counts_it() {
        let store = InMemoryDocumentStore::new();
        store.fail_with(DocumentStoreError::Unavailable("offline".to_string()));

        assert!(store.list_all("movies").await.is_err());
        assert!(store.insert("movies", Fields::new()).await.is_err());
        assert_eq!(store.call_count(), 2);

        store.clear_error();
        assert!(store.list_all("movies").await.is_ok());
    }
}
