//! AuthController - registration, federated sign-in, and sign-out.
//!
//! Every outcome is reported to the user through the notifier; failures are
//! also logged. The controller never touches the session itself, it only
//! asks the identity service to change it.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, Credentials, Session};
use crate::ports::{IdentityService, Notice, UserNotifier};

/// Email and password typed into the sign-up form.
struct CredentialsDraft {
    email: String,
    password: SecretString,
}

impl Default for CredentialsDraft {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: SecretString::new(String::new()),
        }
    }
}

/// Controller for the sign-up / sign-in / sign-out form.
pub struct AuthController {
    identity: Arc<dyn IdentityService>,
    notifier: Arc<dyn UserNotifier>,
    draft: Mutex<CredentialsDraft>,
}

impl AuthController {
    pub fn new(identity: Arc<dyn IdentityService>, notifier: Arc<dyn UserNotifier>) -> Self {
        Self {
            identity,
            notifier,
            draft: Mutex::new(CredentialsDraft::default()),
        }
    }

    /// Replaces the email draft.
    pub fn set_email(&self, email: impl Into<String>) {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner).email = email.into();
    }

    /// Replaces the password draft.
    pub fn set_password(&self, password: impl Into<String>) {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner).password =
            SecretString::new(password.into());
    }

    /// Current email draft, for re-rendering the form.
    pub fn email_draft(&self) -> String {
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .email
            .clone()
    }

    /// Registers with whatever is currently in the drafts.
    pub async fn register_from_draft(&self) -> Result<Session, AuthError> {
        let (email, password) = {
            let draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
            (draft.email.clone(), draft.password.expose_secret().clone())
        };
        self.register(email, password).await
    }

    /// Creates an account and signs it in.
    ///
    /// Credentials are not checked here; the identity service decides what
    /// is acceptable and its message is shown to the user on rejection.
    pub async fn register(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Session, AuthError> {
        let credentials = Credentials::new(email, password);

        match self.identity.register_with_password(&credentials).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user_id, "Sign up succeeded");
                self.notifier.notify(Notice::success("Sign up successful!"));
                Ok(session)
            }
            Err(e) => {
                tracing::error!(error = %e, "Sign up failed");
                self.notifier
                    .notify(Notice::failure(format!("Error signing up: {}", e)));
                Err(e)
            }
        }
    }

    /// Runs the interactive third-party sign-in.
    pub async fn sign_in_federated(&self) -> Result<Session, AuthError> {
        match self.identity.sign_in_interactive().await {
            Ok(session) => {
                tracing::info!(user_id = %session.user_id, "Federated sign-in succeeded");
                self.notifier
                    .notify(Notice::success("Sign in with Google successful!"));
                Ok(session)
            }
            Err(e) => {
                tracing::error!(error = %e, "Federated sign-in failed");
                self.notifier.notify(Notice::failure(format!(
                    "Error signing in with Google: {}",
                    e
                )));
                Err(e)
            }
        }
    }

    /// Ends the current session.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self.identity.sign_out().await {
            Ok(()) => {
                tracing::info!("Sign out succeeded");
                self.notifier.notify(Notice::success("Logout successful!"));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Sign out failed");
                self.notifier
                    .notify(Notice::failure(format!("Error logging out: {}", e)));
                Err(e)
            }
        }
    }

    /// Snapshot of the current session.
    pub fn current_session(&self) -> Option<Session> {
        self.identity.current_session()
    }
}
