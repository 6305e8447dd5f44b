//! Firebase adapters - REST implementations of the backend ports.
//!
//! - `FirebaseIdentityService` - Identity Toolkit sign-up and IdP sign-in
//! - `FirestoreDocumentStore` - Firestore documents API
//! - `FirebaseBlobStore` - Firebase Storage objects API
//! - `StaticCredentialSource` - Federated credential from configuration
//!
//! The stores authenticate as whichever user the identity service has
//! signed in, through the [`IdTokenSource`] seam.
//!
//! # Configuration
//!
//! ```ignore
//! let config = FirebaseConfig::new("my-project", api_key, "my-project.appspot.com")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let identity = Arc::new(FirebaseIdentityService::new(config.clone(), credentials)?);
//! let documents = FirestoreDocumentStore::new(config.clone(), identity.clone())?;
//! let blobs = FirebaseBlobStore::new(config, identity.clone())?;
//! ```

mod credential_source;
mod firestore;
mod identity;
mod storage;
mod value;

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub use credential_source::StaticCredentialSource;
pub use firestore::FirestoreDocumentStore;
pub use identity::FirebaseIdentityService;
pub use storage::FirebaseBlobStore;

const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";

/// Connection settings shared by the Firebase adapters.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// Web API key of the project.
    api_key: SecretString,
    /// Storage bucket, e.g. `my-project.appspot.com`.
    pub storage_bucket: String,
    pub timeout: Duration,
    pub identity_base_url: String,
    pub firestore_base_url: String,
    pub storage_base_url: String,
}

impl FirebaseConfig {
    pub fn new(
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        storage_bucket: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: SecretString::new(api_key.into()),
            storage_bucket: storage_bucket.into(),
            timeout: Duration::from_secs(30),
            identity_base_url: IDENTITY_BASE_URL.to_string(),
            firestore_base_url: FIRESTORE_BASE_URL.to_string(),
            storage_base_url: STORAGE_BASE_URL.to_string(),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    fn http_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.timeout).build()
    }
}

/// Supplies the signed-in user's id token for authenticated requests.
pub trait IdTokenSource: Send + Sync {
    /// Current id token, or `None` when nobody is signed in.
    fn id_token(&self) -> Option<SecretString>;
}

/// Error envelope returned by Google REST APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Extracts `error.message` from an error response, falling back to the raw
/// body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}
