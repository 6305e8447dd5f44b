//! Firestore document store adapter.
//!
//! Talks to the Firestore REST API under
//! `projects/{project}/databases/(default)/documents`. Listing follows
//! `nextPageToken` until the collection is exhausted. Requests carry the
//! signed-in user's id token as a bearer token so security rules see the
//! right user.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::domain::movie::Fields;
use crate::ports::{Document, DocumentStore, DocumentStoreError};

use super::value::{decode_fields, encode_fields};
use super::{api_error_message, FirebaseConfig, IdTokenSource};

const PAGE_SIZE: &str = "300";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreDocument {
    /// The id is the last segment of the resource name.
    fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Firestore implementation of `DocumentStore`.
pub struct FirestoreDocumentStore {
    config: FirebaseConfig,
    client: Client,
    tokens: Arc<dyn IdTokenSource>,
}

impl FirestoreDocumentStore {
    pub fn new(
        config: FirebaseConfig,
        tokens: Arc<dyn IdTokenSource>,
    ) -> Result<Self, reqwest::Error> {
        let client = config.http_client()?;
        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    /// URL of a collection, or of one document when `id` is given.
    fn document_url(&self, collection: &str, id: Option<&str>) -> Result<Url, DocumentStoreError> {
        let mut url = Url::parse(&self.config.firestore_base_url)
            .map_err(|e| DocumentStoreError::Unavailable(format!("bad base URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DocumentStoreError::Unavailable("base URL cannot hold a path".into()))?;
            segments
                .pop_if_empty()
                .extend(["projects", self.config.project_id.as_str()])
                .extend(["databases", "(default)", "documents", collection]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url.query_pairs_mut().append_pair("key", self.config.api_key());
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.id_token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        collection: &str,
        id: &str,
    ) -> Result<Response, DocumentStoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| DocumentStoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, collection, id, api_error_message(&body)))
    }

    fn decode_document(doc: &FirestoreDocument) -> Option<Document> {
        match decode_fields(&doc.fields) {
            Ok(fields) => Some(Document {
                id: doc.id().to_string(),
                fields,
            }),
            Err(reason) => {
                tracing::warn!(document = %doc.name, reason = %reason, "Skipping undecodable document");
                None
            }
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, DocumentStoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.document_url(collection, None)?;
            url.query_pairs_mut().append_pair("pageSize", PAGE_SIZE);
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }
            tracing::debug!(collection = %collection, "Fetching Firestore page");

            let page: ListResponse = self
                .execute(self.client.get(url), collection, "")
                .await?
                .json()
                .await
                .map_err(|e| DocumentStoreError::InvalidResponse(e.to_string()))?;

            documents.extend(page.documents.iter().filter_map(Self::decode_document));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(documents)
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, DocumentStoreError> {
        let url = self.document_url(collection, None)?;
        let body = json!({ "fields": encode_fields(&fields) });

        let created: FirestoreDocument = self
            .execute(self.client.post(url).json(&body), collection, "")
            .await?
            .json()
            .await
            .map_err(|e| DocumentStoreError::InvalidResponse(e.to_string()))?;

        Ok(created.id().to_string())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        let mut url = self.document_url(collection, Some(id))?;
        {
            let mut query = url.query_pairs_mut();
            for key in fields.keys() {
                query.append_pair("updateMask.fieldPaths", key);
            }
            query.append_pair("currentDocument.exists", "true");
        }
        let body = json!({ "fields": encode_fields(&fields) });

        self.execute(self.client.patch(url).json(&body), collection, id)
            .await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        let url = self.document_url(collection, Some(id))?;
        self.execute(self.client.delete(url), collection, id).await?;
        Ok(())
    }
}

fn map_status(status: StatusCode, collection: &str, id: &str, message: String) -> DocumentStoreError {
    match status {
        StatusCode::NOT_FOUND => DocumentStoreError::not_found(collection, id),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DocumentStoreError::PermissionDenied(message)
        }
        StatusCode::TOO_MANY_REQUESTS => DocumentStoreError::Unavailable(message),
        s if s.is_server_error() => DocumentStoreError::Unavailable(message),
        _ => DocumentStoreError::InvalidResponse(format!("{}: {}", status, message)),
    }
}
