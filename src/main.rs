use std::sync::Arc;

use secrecy::ExposeSecret;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fireform::adapters::{
    app_router, AppState, FirebaseBlobStore, FirebaseConfig, FirebaseIdentityService,
    FirestoreDocumentStore, FlashNotifier, InMemoryBlobStore, InMemoryDocumentStore,
    InMemoryIdentityService, StaticCredentialSource,
};
use fireform::application::{AuthController, RecordController};
use fireform::config::{AppConfig, BackendKind, FirebaseSettings, ValidationError};
use fireform::ports::{BlobStore, DocumentStore, IdentityService};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

struct Backend {
    identity: Arc<dyn IdentityService>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let backend = match config.backend.kind {
        BackendKind::Memory => memory_backend(),
        BackendKind::Firebase => firebase_backend(&config.firebase)?,
    };
    info!(backend = ?config.backend.kind, "Backend ready");

    let notices = Arc::new(FlashNotifier::new());
    let auth = Arc::new(AuthController::new(backend.identity.clone(), notices.clone()));
    let records = Arc::new(RecordController::new(
        backend.identity,
        backend.documents,
        backend.blobs,
        notices.clone(),
        config.store.locations(),
    ));

    // Initial load; failures are logged and leave the lists empty.
    let _ = records.list_records().await;
    let _ = records.list_blobs().await;

    let state = AppState::new(auth, records, notices)
        .with_max_upload_bytes(config.server.max_upload_bytes);
    let app = app_router(state).layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    info!("Server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

fn memory_backend() -> Backend {
    Backend {
        identity: Arc::new(InMemoryIdentityService::new()),
        documents: Arc::new(InMemoryDocumentStore::new()),
        blobs: Arc::new(InMemoryBlobStore::new()),
    }
}

fn firebase_backend(settings: &FirebaseSettings) -> Result<Backend, BoxError> {
    let project_id = settings
        .project_id
        .clone()
        .ok_or(ValidationError::MissingRequired("firebase.project_id"))?;
    let api_key = settings
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().clone())
        .ok_or(ValidationError::MissingRequired("firebase.api_key"))?;
    let bucket = settings
        .storage_bucket
        .clone()
        .ok_or(ValidationError::MissingRequired("firebase.storage_bucket"))?;

    let config =
        FirebaseConfig::new(project_id, api_key, bucket).with_timeout(settings.request_timeout());
    let credentials = Arc::new(StaticCredentialSource::new(settings.google_id_token.clone()));
    let identity = Arc::new(FirebaseIdentityService::new(config.clone(), credentials)?);

    Ok(Backend {
        documents: Arc::new(FirestoreDocumentStore::new(config.clone(), identity.clone())?),
        blobs: Arc::new(FirebaseBlobStore::new(config, identity.clone())?),
        identity,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
