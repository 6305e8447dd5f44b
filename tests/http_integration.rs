//! Integration tests for the form page.
//!
//! These tests drive the router over the in-memory adapters:
//! 1. Every form post redirects back to the page
//! 2. Controller outcomes show up as notices on the next render
//! 3. Drafts are rendered back into the forms

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{header, Request, StatusCode};
use tower::ServiceExt;

use fireform::adapters::{
    app_router, AppState, FlashNotifier, InMemoryBlobStore, InMemoryDocumentStore,
    InMemoryIdentityService,
};
use fireform::application::{AuthController, RecordController, RecordLocations};
use fireform::domain::foundation::{Session, UserId};

// =============================================================================
// Test Infrastructure
// =============================================================================

const BOUNDARY: &str = "fireform-test-boundary";

struct TestApp {
    router: Router,
    records: Arc<RecordController>,
    blobs: Arc<InMemoryBlobStore>,
}

fn test_app(identity: InMemoryIdentityService) -> TestApp {
    test_app_with(identity, |state| state)
}

fn test_app_with(
    identity: InMemoryIdentityService,
    configure: impl FnOnce(AppState) -> AppState,
) -> TestApp {
    let identity = Arc::new(identity);
    let documents = Arc::new(InMemoryDocumentStore::new());
    let blobs = Arc::new(InMemoryBlobStore::new().with_base_url("https://files.test"));
    let notices = Arc::new(FlashNotifier::new());
    let auth = Arc::new(AuthController::new(identity.clone(), notices.clone()));
    let records = Arc::new(RecordController::new(
        identity,
        documents,
        blobs.clone(),
        notices.clone(),
        RecordLocations::default(),
    ));
    TestApp {
        router: app_router(configure(AppState::new(auth, records.clone(), notices))),
        records,
        blobs,
    }
}

fn signed_in() -> InMemoryIdentityService {
    InMemoryIdentityService::new()
        .signed_in_as(Session::new(UserId::new("web-user").unwrap()).with_email("web@example.com"))
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_post(file_name: &str, contents: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        c = contents
    );
    Request::builder()
        .method("POST")
        .uri("/files")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Sends a post and checks it redirects back to the page.
async fn post(app: &TestApp, request: Request<Body>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

async fn page(app: &TestApp) -> String {
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// Page
// =============================================================================

#[tokio::test]
async fn empty_page_renders_all_forms() {
    let app = test_app(InMemoryIdentityService::new());

    let html = page(&app).await;

    assert!(html.contains("Not signed in"));
    assert!(html.contains("action=\"/auth/register\""));
    assert!(html.contains("action=\"/movies\""));
    assert!(html.contains("enctype=\"multipart/form-data\""));
}

#[tokio::test]
async fn notices_are_shown_once() {
    let app = test_app(InMemoryIdentityService::new());
    post(&app, form_post("/movies", "title=Heat")).await;

    let first = page(&app).await;
    let second = page(&app).await;

    assert!(first.contains("Please log in to submit a movie."));
    assert!(!second.contains("Please log in to submit a movie."));
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn register_signs_in_and_reports_success() {
    let app = test_app(InMemoryIdentityService::new());

    post(
        &app,
        form_post("/auth/register", "email=new%40example.com&password=secret123"),
    )
    .await;

    let html = page(&app).await;
    assert!(html.contains("Sign up successful!"));
    assert!(html.contains("Signed in as new@example.com"));
    assert!(html.contains("value=\"new@example.com\""));
}

#[tokio::test]
async fn rejected_registration_shows_backend_message() {
    let app = test_app(InMemoryIdentityService::new());

    post(&app, form_post("/auth/register", "email=bad&password=secret123")).await;

    let html = page(&app).await;
    assert!(html.contains("Error signing up: The email address is badly formatted."));
    assert!(html.contains("Not signed in"));
}

#[tokio::test]
async fn google_sign_in_without_credential_reports_error() {
    let app = test_app(InMemoryIdentityService::new());

    post(&app, form_post("/auth/google", "")).await;

    assert!(page(&app).await.contains("Error signing in with Google"));
}

#[tokio::test]
async fn register_form_button_reads_sign_up() {
    let app = test_app(InMemoryIdentityService::new());

    let html = page(&app).await;

    assert!(html.contains("<button type=\"submit\">Sign Up</button>"));
}

#[tokio::test]
async fn logout_clears_session() {
    let app = test_app(signed_in());

    post(&app, form_post("/auth/logout", "")).await;

    let html = page(&app).await;
    assert!(html.contains("Logout successful!"));
    assert!(html.contains("Not signed in"));
}

// =============================================================================
// Movies
// =============================================================================

#[tokio::test]
async fn submitted_movie_is_listed_and_draft_kept() {
    let app = test_app(signed_in());

    post(
        &app,
        form_post("/movies", "title=Inception&releaseDate=2010&receivedAnOscar=on"),
    )
    .await;

    let movies = app.records.movies().await;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].release_date, 2010);
    assert!(movies[0].received_award);

    let html = page(&app).await;
    assert!(html.contains("<h2 style=\"color: green\">Inception</h2>"));
    assert!(html.contains("value=\"Inception\""));
    assert!(html.contains("value=\"2010\""));
}

#[tokio::test]
async fn movie_can_be_renamed_and_deleted() {
    let app = test_app(signed_in());
    post(&app, form_post("/movies", "title=Heat&releaseDate=1995")).await;
    let id = app.records.movies().await[0].id.clone();

    post(&app, form_post(&format!("/movies/{}/title", id), "title=Ronin")).await;
    assert_eq!(app.records.movies().await[0].title, "Ronin");

    post(&app, form_post(&format!("/movies/{}/delete", id), "")).await;
    assert!(app.records.movies().await.is_empty());
}

// =============================================================================
// Files
// =============================================================================

#[tokio::test]
async fn uploaded_file_is_linked_on_page() {
    let app = test_app(signed_in());

    post(&app, multipart_post("notes.txt", "hello")).await;

    let html = page(&app).await;
    assert!(html.contains(">notes.txt</a>"));
    assert!(html.contains("href=\"https://files.test/projectFiles/notes.txt?token="));
}

#[tokio::test]
async fn upload_larger_than_axum_default_limit_is_stored() {
    let app = test_app(signed_in());
    let contents = "x".repeat(3 * 1024 * 1024);

    post(&app, multipart_post("big.bin", &contents)).await;

    assert_eq!(app.blobs.object_count().await, 1);
    assert_eq!(
        app.blobs.get("projectFiles/big.bin").await.map(|(bytes, _)| bytes.len()),
        Some(contents.len())
    );
}

#[tokio::test]
async fn upload_over_configured_limit_is_rejected() {
    let app = test_app_with(signed_in(), |state| state.with_max_upload_bytes(1024));

    let response = app
        .router
        .clone()
        .oneshot(multipart_post("big.bin", &"x".repeat(4096)))
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::OK);
    assert_eq!(app.blobs.call_count(), 0);
}

#[tokio::test]
async fn upload_with_empty_file_name_is_ignored() {
    let app = test_app(signed_in());

    post(&app, multipart_post("", "")).await;

    assert_eq!(app.blobs.call_count(), 0);
}

#[tokio::test]
async fn file_can_be_deleted_by_name() {
    let app = test_app(signed_in());
    post(&app, multipart_post("notes.txt", "hello")).await;

    post(&app, form_post("/files/delete", "name=notes.txt")).await;

    assert!(app.records.files().await.is_empty());
    assert_eq!(app.blobs.object_count().await, 0);
}
