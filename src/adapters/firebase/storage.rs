//! Firebase Storage blob store adapter.
//!
//! Objects are addressed as `/v0/b/{bucket}/o/{path}` with the whole path
//! percent-encoded into one segment. Download URLs are the public media
//! URL plus the object's first download token. Requests carry the signed-in
//! user's id token in a `Firebase` authorization header.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::domain::file::object_name;
use crate::ports::{BlobRef, BlobStore, BlobStoreError};

use super::{api_error_message, FirebaseConfig, IdTokenSource};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    items: Vec<ObjectItem>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectItem {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    #[serde(default)]
    download_tokens: Option<String>,
}

impl ObjectMetadata {
    /// Objects can carry several comma-separated tokens; any one works.
    fn first_token(&self) -> Option<&str> {
        self.download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()))
    }
}

/// Firebase Storage implementation of `BlobStore`.
pub struct FirebaseBlobStore {
    config: FirebaseConfig,
    client: Client,
    tokens: Arc<dyn IdTokenSource>,
}

impl FirebaseBlobStore {
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

    /// URL of the bucket's object collection, or of one object.
    fn object_url(&self, path: Option<&str>) -> Result<Url, BlobStoreError> {
        let mut url = Url::parse(&self.config.storage_base_url)
            .map_err(|e| BlobStoreError::Unavailable(format!("bad base URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BlobStoreError::Unavailable("base URL cannot hold a path".into()))?;
            segments
                .pop_if_empty()
                .extend(["b", self.config.storage_bucket.as_str(), "o"]);
            if let Some(path) = path {
                segments.push(path);
            }
        }
        Ok(url)
    }

    fn download_url(&self, path: &str, token: &str) -> Result<String, BlobStoreError> {
        let mut url = self.object_url(Some(path))?;
        url.query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("token", token);
        Ok(url.into())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.id_token() {
            Some(token) => request.header(AUTHORIZATION, format!("Firebase {}", token.expose_secret())),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<Response, BlobStoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| BlobStoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, path, api_error_message(&body)))
    }
}

#[async_trait]
impl BlobStore for FirebaseBlobStore {
    async fn list_under_prefix(&self, prefix: &str) -> Result<Vec<BlobRef>, BlobStoreError> {
        let folder = format!("{}/", prefix.trim_end_matches('/'));
        let mut blobs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.object_url(None)?;
            url.query_pairs_mut()
                .append_pair("prefix", &folder)
                .append_pair("delimiter", "/");
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }
            tracing::debug!(prefix = %folder, "Listing Storage objects");

            let page: ListResponse = self
                .execute(self.client.get(url), &folder)
                .await?
                .json()
                .await
                .map_err(|e| BlobStoreError::InvalidResponse(e.to_string()))?;

            blobs.extend(
                page.items
                    .into_iter()
                    .filter(|item| item.name.len() > folder.len() && !item.name.ends_with('/'))
                    .map(|item| BlobRef {
                        name: object_name(&item.name).to_string(),
                        path: item.name,
                    }),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(blobs)
    }

    async fn resolve_url(&self, path: &str) -> Result<String, BlobStoreError> {
        let url = self.object_url(Some(path))?;
        let metadata: ObjectMetadata = self
            .execute(self.client.get(url), path)
            .await?
            .json()
            .await
            .map_err(|e| BlobStoreError::InvalidResponse(e.to_string()))?;

        let token = metadata
            .first_token()
            .ok_or_else(|| BlobStoreError::InvalidResponse(format!("no download token for {}", path)))?;
        self.download_url(path, token)
    }

    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), BlobStoreError> {
        let mut url = self.object_url(None)?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", path);

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .body(bytes.to_vec());
        self.execute(request, path).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        let url = self.object_url(Some(path))?;
        self.execute(self.client.delete(url), path).await?;
        Ok(())
    }
}

fn map_status(status: StatusCode, path: &str, message: String) -> BlobStoreError {
    match status {
        StatusCode::NOT_FOUND => BlobStoreError::NotFound(path.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BlobStoreError::PermissionDenied(message),
        StatusCode::TOO_MANY_REQUESTS => BlobStoreError::Unavailable(message),
        s if s.is_server_error() => BlobStoreError::Unavailable(message),
        _ => BlobStoreError::InvalidResponse(format!("{}: {}", status, message)),
    }
}
