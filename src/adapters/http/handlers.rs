//! HTTP handlers for the form page.
//!
//! Every POST runs one controller operation and redirects back to the page.
//! Controller errors are already logged and, where the user should see
//! them, already queued as notices, so handlers drop them.

use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
    Form,
};

use crate::application::CreateRecordCommand;
use crate::domain::file::FileUpload;
use crate::domain::foundation::MovieId;

use super::dto::{DeleteFileForm, MovieForm, RegisterForm, RenameForm};
use super::state::AppState;
use super::views::{render_page, PageView};

/// Multipart field carrying the selected file.
const FILE_FIELD: &str = "file";

fn back_to_page() -> Redirect {
    Redirect::to("/")
}

// ════════════════════════════════════════════════════════════════════════════
// Page
// ════════════════════════════════════════════════════════════════════════════

/// GET / - Render the page, draining pending notices
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = PageView {
        session: state.auth.current_session(),
        email_draft: state.auth.email_draft(),
        movie_draft: state.movie_draft(),
        rename_draft: state.rename_draft(),
        movies: state.records.movies().await,
        files: state.records.files().await,
        notices: state.notices.drain(),
    };
    Html(render_page(&view))
}

// ════════════════════════════════════════════════════════════════════════════
// Auth
// ════════════════════════════════════════════════════════════════════════════

/// POST /auth/register - Create an account from the form
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Redirect {
    state.auth.set_email(form.email);
    state.auth.set_password(form.password);
    let _ = state.auth.register_from_draft().await;
    back_to_page()
}

/// POST /auth/google - Federated sign-in
pub async fn sign_in_google(State(state): State<AppState>) -> Redirect {
    let _ = state.auth.sign_in_federated().await;
    back_to_page()
}

/// POST /auth/logout - Sign out
pub async fn sign_out(State(state): State<AppState>) -> Redirect {
    let _ = state.auth.sign_out().await;
    back_to_page()
}

// ════════════════════════════════════════════════════════════════════════════
// Movies
// ════════════════════════════════════════════════════════════════════════════

/// POST /movies - Submit the new-movie form
pub async fn create_movie(State(state): State<AppState>, Form(form): Form<MovieForm>) -> Redirect {
    let draft = state.edit_movie_draft(|draft| form.apply_to(draft));
    let _ = state
        .records
        .create_record(CreateRecordCommand::from(&draft))
        .await;
    back_to_page()
}

/// POST /movies/:id/delete - Delete a movie
pub async fn delete_movie(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    match MovieId::new(id) {
        Ok(id) => {
            let _ = state.records.delete_record(&id).await;
        }
        Err(e) => tracing::warn!(error = %e, "Ignoring delete with invalid movie id"),
    }
    back_to_page()
}

/// POST /movies/:id/title - Rename a movie
pub async fn rename_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<RenameForm>,
) -> Redirect {
    state.set_rename_draft(form.title);
    match MovieId::new(id) {
        Ok(id) => {
            let _ = state
                .records
                .update_record_title(&id, state.rename_draft())
                .await;
        }
        Err(e) => tracing::warn!(error = %e, "Ignoring rename with invalid movie id"),
    }
    back_to_page()
}

// ════════════════════════════════════════════════════════════════════════════
// Files
// ════════════════════════════════════════════════════════════════════════════

/// POST /files - Upload the selected file
pub async fn upload_file(State(state): State<AppState>, multipart: Multipart) -> Redirect {
    let selected = match read_selected_file(multipart).await {
        Ok(selected) => selected,
        Err(reason) => {
            tracing::error!(reason = %reason, "Upload rejected");
            return back_to_page();
        }
    };
    let _ = state.records.upload_blob(selected).await;
    back_to_page()
}

/// POST /files/delete - Delete a file by name
pub async fn delete_file(
    State(state): State<AppState>,
    Form(form): Form<DeleteFileForm>,
) -> Redirect {
    let _ = state.records.delete_blob(&form.name).await;
    back_to_page()
}

/// Pulls the file field out of the form.
///
/// Browsers submit the field with an empty file name when nothing was
/// picked; that counts as no selection.
async fn read_selected_file(mut multipart: Multipart) -> Result<Option<FileUpload>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| e.to_string())?;
        return FileUpload::new(name, content_type, bytes.to_vec())
            .map(Some)
            .map_err(|e| e.to_string());
    }
    Ok(None)
}
