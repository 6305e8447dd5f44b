//! HTTP routes for the form page.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_movie, delete_file, delete_movie, index, register, rename_movie, sign_in_google,
    sign_out, upload_file,
};
use super::state::AppState;

/// Creates the page router with all endpoints.
///
/// Only the upload route lifts the default body limit, to the size the
/// state carries.
pub fn app_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes());
    Router::new()
        .route("/", get(index))
        .route("/auth/register", post(register))
        .route("/auth/google", post(sign_in_google))
        .route("/auth/logout", post(sign_out))
        .route("/movies", post(create_movie))
        .route("/movies/:id/delete", post(delete_movie))
        .route("/movies/:id/title", post(rename_movie))
        .route("/files", post(upload_file).layer(upload_limit))
        .route("/files/delete", post(delete_file))
        .with_state(state)
}
