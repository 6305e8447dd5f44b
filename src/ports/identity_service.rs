//! Identity service port.
//!
//! The identity service owns the session. Controllers only ever read a
//! snapshot of it through [`IdentityService::current_session`].
//!
//! # Example
//!
//! ```ignore
//! async fn sign_up(identity: Arc<dyn IdentityService>) -> Result<(), AuthError> {
//!     let session = identity
//!         .register_with_password(&Credentials::new("a@example.com", "secret123"))
//!         .await?;
//!     assert_eq!(identity.current_session(), Some(session));
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, Credentials, Session};

/// Registers, signs in, and signs out users.
///
/// # Contract
///
/// Implementations must:
/// - Establish the session on successful registration or sign-in
/// - Leave the session untouched when an operation fails
/// - Clear the session on sign-out, even if none was present
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Creates an account and signs it in.
    async fn register_with_password(&self, credentials: &Credentials)
        -> Result<Session, AuthError>;

    /// Runs the third-party interactive sign-in flow.
    async fn sign_in_interactive(&self) -> Result<Session, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Snapshot of the current session, if any.
    fn current_session(&self) -> Option<Session>;
}

/// Credential returned by a third-party identity provider.
#[derive(Debug)]
pub struct FederatedCredential {
    /// Provider identifier, e.g. `google.com`.
    pub provider_id: String,
    id_token: SecretString,
}

impl FederatedCredential {
    pub fn new(provider_id: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            id_token: SecretString::new(id_token.into()),
        }
    }

    pub fn id_token(&self) -> &str {
        self.id_token.expose_secret()
    }
}

/// Supplies the third-party credential for interactive sign-in.
///
/// Returning `AuthError::Cancelled` means the user backed out of the flow.
#[async_trait]
pub trait FederatedCredentialSource: Send + Sync {
    async fn obtain(&self) -> Result<FederatedCredential, AuthError>;
}
