//! Authentication types for the domain layer.
//!
//! These types describe the signed-in principal and the ways signing in can
//! fail. They carry **no provider dependencies** - the in-memory fake and the
//! Firebase adapter both populate them through the `IdentityService` port.
//!
//! # Design Decisions
//!
//! - `Session` is a read-only snapshot; only the identity service creates or
//!   destroys the underlying session
//! - `Credentials` keeps the password behind `secrecy` so it never shows up
//!   in `Debug` output or logs
//! - `AuthError` messages are shown to the user verbatim

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::UserId;

/// The currently authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The unique user identifier from the identity service.
    pub user_id: UserId,

    /// Email address, when the sign-in method provides one.
    pub email: Option<String>,

    /// Display name, typically only present after federated sign-in.
    pub display_name: Option<String>,
}

impl Session {
    /// Creates a session for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            display_name: None,
        }
    }

    /// Attaches an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attaches a display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the display name, falling back to the email, then the user id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.user_id.as_str())
    }
}

/// Email/password pair submitted for registration.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Exposes the password for transmission to the identity service.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Errors reported by the identity service.
///
/// Validation of credentials happens on the backend; these variants mirror
/// the rejections it can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("The email address is badly formatted.")]
    InvalidEmail,

    #[error("Password should be at least 6 characters.")]
    WeakPassword,

    #[error("The email address is already in use by another account.")]
    EmailExists,

    #[error("Sign-in was cancelled: {0}")]
    Cancelled(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Creates a cancelled sign-in error with a reason.
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled(reason.into())
    }
}
