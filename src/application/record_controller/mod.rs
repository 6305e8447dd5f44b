//! RecordController - movies in the document store, files in the blob store.
//!
//! The controller owns the local caches the page renders from. Every
//! successful mutation is followed by a full re-fetch of the affected list;
//! the caches are never patched locally. Refreshes are not sequenced, so when
//! two overlap the one that completes last wins.
//!
//! Remote failures are logged and returned to the caller but never shown to
//! the user. Only the "please log in" preconditions produce a notice.

mod files;
mod movies;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::file::BlobEntry;
use crate::domain::foundation::Session;
use crate::domain::movie::Movie;
use crate::ports::{
    BlobStore, BlobStoreError, DocumentStore, DocumentStoreError, IdentityService, Notice,
    UserNotifier,
};

pub use movies::CreateRecordCommand;

/// Errors from record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("No user is signed in")]
    NotSignedIn,

    #[error(transparent)]
    Document(#[from] DocumentStoreError),

    #[error(transparent)]
    Blob(#[from] BlobStoreError),
}

/// Where records and files live in the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocations {
    /// Document collection holding movies.
    pub movies_collection: String,
    /// Blob prefix files are uploaded under.
    pub files_prefix: String,
}

impl Default for RecordLocations {
    fn default() -> Self {
        Self {
            movies_collection: "movies".to_string(),
            files_prefix: "projectFiles".to_string(),
        }
    }
}

/// Controller for the movie and file sections of the page.
pub struct RecordController {
    identity: Arc<dyn IdentityService>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    notifier: Arc<dyn UserNotifier>,
    locations: RecordLocations,
    movies: RwLock<Vec<Movie>>,
    files: RwLock<Vec<BlobEntry>>,
}

impl RecordController {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        notifier: Arc<dyn UserNotifier>,
        locations: RecordLocations,
    ) -> Self {
        Self {
            identity,
            documents,
            blobs,
            notifier,
            locations,
            movies: RwLock::new(Vec::new()),
            files: RwLock::new(Vec::new()),
        }
    }

    /// Movies as of the last successful listing.
    pub async fn movies(&self) -> Vec<Movie> {
        self.movies.read().await.clone()
    }

    /// Files as of the last successful listing.
    pub async fn files(&self) -> Vec<BlobEntry> {
        self.files.read().await.clone()
    }

    pub fn locations(&self) -> &RecordLocations {
        &self.locations
    }

    /// Returns the session, or tells the user to log in.
    fn require_session(&self, message: &str) -> Result<Session, RecordError> {
        match self.identity.current_session() {
            Some(session) => Ok(session),
            None => {
                tracing::debug!("Rejected record operation without a session");
                self.notifier.notify(Notice::info(message));
                Err(RecordError::NotSignedIn)
            }
        }
    }
}
