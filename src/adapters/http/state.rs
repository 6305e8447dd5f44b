//! Shared state for the page handlers.

use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::notify::FlashNotifier;
use crate::application::{AuthController, RecordController};
use crate::domain::movie::MovieDraft;

/// Inputs the page renders back into its forms.
#[derive(Debug, Default)]
struct PageDrafts {
    movie: MovieDraft,
    rename: String,
}

/// Largest accepted upload body unless configured otherwise.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthController>,
    pub records: Arc<RecordController>,
    pub notices: Arc<FlashNotifier>,
    drafts: Arc<Mutex<PageDrafts>>,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthController>,
        records: Arc<RecordController>,
        notices: Arc<FlashNotifier>,
    ) -> Self {
        Self {
            auth,
            records,
            notices,
            drafts: Arc::new(Mutex::new(PageDrafts::default())),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Caps the request body accepted by the upload form.
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn movie_draft(&self) -> MovieDraft {
        self.lock_drafts().movie.clone()
    }

    /// Applies `edit` to the movie draft and returns the result.
    pub fn edit_movie_draft(&self, edit: impl FnOnce(&mut MovieDraft)) -> MovieDraft {
        let mut drafts = self.lock_drafts();
        edit(&mut drafts.movie);
        drafts.movie.clone()
    }

    pub fn rename_draft(&self) -> String {
        self.lock_drafts().rename.clone()
    }

    pub fn set_rename_draft(&self, title: impl Into<String>) {
        self.lock_drafts().rename = title.into();
    }

    fn lock_drafts(&self) -> std::sync::MutexGuard<'_, PageDrafts> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
