//! In-memory identity service.
//!
//! Keeps accounts and the current session in process memory. Registration
//! applies the same rejections the managed backend does (badly formatted
//! email, short password, duplicate email) so controller error paths can be
//! exercised without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::{AuthError, Credentials, Session, UserId};
use crate::ports::IdentityService;

const MIN_PASSWORD_LEN: usize = 6;

/// In-memory identity service for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryIdentityService {
    /// User ids keyed by email
    accounts: RwLock<HashMap<String, UserId>>,
    /// The signed-in session
    current: RwLock<Option<Session>>,
    /// Session the interactive flow yields; `None` behaves like a closed popup
    federated: RwLock<Option<Session>>,
    /// Optional error to return for all operations (for error testing)
    force_error: RwLock<Option<AuthError>>,
    calls: AtomicUsize,
}

impl InMemoryIdentityService {
    /// Creates a new service with no accounts and no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `session` already signed in.
    pub fn signed_in_as(self, session: Session) -> Self {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self
    }

    /// Makes the interactive flow succeed with `session`.
    pub fn with_federated_user(self, session: Session) -> Self {
        *self.federated.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self
    }

    /// Forces all operations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of register / sign-in / sign-out calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn begin_call(&self) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn establish(&self, session: Session) -> Session {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        session
    }
}

fn is_well_formed_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentityService {
    async fn register_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        self.begin_call()?;

        if !is_well_formed_email(&credentials.email) {
            return Err(AuthError::InvalidEmail);
        }
        if credentials.password().chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let user_id = {
            let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
            if accounts.contains_key(&credentials.email) {
                return Err(AuthError::EmailExists);
            }
            let user_id = UserId::new(Uuid::new_v4().simple().to_string())
                .map_err(|e| AuthError::service_unavailable(e.to_string()))?;
            accounts.insert(credentials.email.clone(), user_id.clone());
            user_id
        };

        Ok(self.establish(Session::new(user_id).with_email(credentials.email.clone())))
    }

    async fn sign_in_interactive(&self) -> Result<Session, AuthError> {
        self.begin_call()?;

        let federated = self
            .federated
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match federated {
            Some(session) => Ok(self.establish(session)),
            None => Err(AuthError::cancelled("The popup has been closed by the user")),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.begin_call()?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
