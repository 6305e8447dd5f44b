//! Federated credential from configuration.
//!
//! A server-rendered page has no popup to run, so the Google id token to
//! exchange is supplied up front. Without one, every interactive sign-in is
//! reported as cancelled.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::AuthError;
use crate::ports::{FederatedCredential, FederatedCredentialSource};

const GOOGLE_PROVIDER_ID: &str = "google.com";

/// Hands out a fixed Google id token.
pub struct StaticCredentialSource {
    google_id_token: Option<SecretString>,
}

impl StaticCredentialSource {
    pub fn new(google_id_token: Option<SecretString>) -> Self {
        Self { google_id_token }
    }
}

#[async_trait]
impl FederatedCredentialSource for StaticCredentialSource {
    async fn obtain(&self) -> Result<FederatedCredential, AuthError> {
        match &self.google_id_token {
            Some(token) => Ok(FederatedCredential::new(
                GOOGLE_PROVIDER_ID,
                token.expose_secret().clone(),
            )),
            None => Err(AuthError::cancelled("no Google credential is configured")),
        }
    }
}
