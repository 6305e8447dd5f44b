//! Form bodies posted by the page.

use serde::Deserialize;

use crate::application::CreateRecordCommand;
use crate::domain::movie::MovieDraft;

/// POST /auth/register
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /movies
///
/// Field names match the document fields. An unchecked checkbox is simply
/// absent from the body.
#[derive(Debug, Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "releaseDate", default)]
    pub release_date: String,
    #[serde(rename = "receivedAnOscar", default)]
    pub received_award: Option<String>,
}

impl MovieForm {
    /// Copies the submitted values into the draft.
    pub fn apply_to(&self, draft: &mut MovieDraft) {
        draft.title = self.title.clone();
        draft.set_release_date_text(&self.release_date);
        draft.received_award = self.received_award.is_some();
    }
}

impl From<&MovieDraft> for CreateRecordCommand {
    fn from(draft: &MovieDraft) -> Self {
        Self {
            title: draft.title.clone(),
            release_date: draft.release_date,
            received_award: draft.received_award,
        }
    }
}

/// POST /movies/:id/title
#[derive(Debug, Deserialize)]
pub struct RenameForm {
    #[serde(default)]
    pub title: String,
}

/// POST /files/delete
#[derive(Debug, Deserialize)]
pub struct DeleteFileForm {
    pub name: String,
}
