//! Firebase identity adapter.
//!
//! Implements `IdentityService` against the Identity Toolkit REST API:
//! `accounts:signUp` for password registration and `accounts:signInWithIdp`
//! for exchanging a third-party id token. The resulting session and its id
//! token are kept in memory; signing out forgets them locally.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, Credentials, Session, UserId};
use crate::ports::{FederatedCredential, FederatedCredentialSource, IdentityService};

use super::{api_error_message, FirebaseConfig, IdTokenSource};

/// Redirect URI sent with IdP sign-in. Required by the API, unused for
/// id-token exchanges.
const IDP_REQUEST_URI: &str = "http://localhost";

#[derive(Debug)]
struct SignedIn {
    session: Session,
    id_token: SecretString,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpRequest {
    post_body: String,
    request_uri: &'static str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl AuthResponse {
    fn into_signed_in(self) -> Result<SignedIn, AuthError> {
        let user_id = UserId::new(self.local_id)
            .map_err(|e| AuthError::service_unavailable(format!("bad user id: {}", e)))?;
        let mut session = Session::new(user_id);
        if let Some(email) = self.email.filter(|e| !e.is_empty()) {
            session = session.with_email(email);
        }
        if let Some(name) = self.display_name.filter(|n| !n.is_empty()) {
            session = session.with_display_name(name);
        }
        Ok(SignedIn {
            session,
            id_token: SecretString::new(self.id_token),
        })
    }
}

/// Identity Toolkit implementation of `IdentityService`.
pub struct FirebaseIdentityService {
    config: FirebaseConfig,
    client: Client,
    credentials: Arc<dyn FederatedCredentialSource>,
    current: RwLock<Option<SignedIn>>,
}

impl FirebaseIdentityService {
    pub fn new(
        config: FirebaseConfig,
        credentials: Arc<dyn FederatedCredentialSource>,
    ) -> Result<Self, reqwest::Error> {
        let client = config.http_client()?;
        Ok(Self {
            config,
            client,
            credentials,
            current: RwLock::new(None),
        })
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.identity_base_url.trim_end_matches('/'),
            method,
            self.config.api_key()
        )
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<AuthResponse, AuthError> {
        tracing::debug!(method = %method, "Calling Identity Toolkit");

        let response = self
            .client
            .post(self.accounts_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_auth_error(status, &api_error_message(&body)));
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthError::service_unavailable(format!("bad response: {}", e)))
    }

    fn establish(&self, signed_in: SignedIn) -> Session {
        let session = signed_in.session.clone();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(signed_in);
        session
    }
}

#[async_trait]
impl IdentityService for FirebaseIdentityService {
    async fn register_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let request = SignUpRequest {
            email: &credentials.email,
            password: credentials.password(),
            return_secure_token: true,
        };
        let signed_in = self.call("signUp", &request).await?.into_signed_in()?;
        Ok(self.establish(signed_in))
    }

    async fn sign_in_interactive(&self) -> Result<Session, AuthError> {
        let credential = self.credentials.obtain().await?;
        let request = SignInWithIdpRequest {
            post_body: idp_post_body(&credential)?,
            request_uri: IDP_REQUEST_URI,
            return_secure_token: true,
            return_idp_credential: true,
        };
        let signed_in = self.call("signInWithIdp", &request).await?.into_signed_in()?;
        Ok(self.establish(signed_in))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.session.clone())
    }
}

impl IdTokenSource for FirebaseIdentityService {
    fn id_token(&self) -> Option<SecretString> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.id_token.clone())
    }
}

/// Form-encoded credential the IdP endpoint expects in `postBody`.
fn idp_post_body(credential: &FederatedCredential) -> Result<String, AuthError> {
    let mut url = reqwest::Url::parse(IDP_REQUEST_URI)
        .map_err(|e| AuthError::service_unavailable(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("id_token", credential.id_token())
        .append_pair("providerId", &credential.provider_id);
    Ok(url.query().unwrap_or_default().to_string())
}

/// Maps an Identity Toolkit error code to an `AuthError`.
///
/// Codes look like `WEAK_PASSWORD : Password should be at least 6
/// characters`; only the part before the colon is significant.
fn map_auth_error(status: StatusCode, message: &str) -> AuthError {
    let code = message.split(':').next().unwrap_or_default().trim();
    match code {
        "EMAIL_EXISTS" => AuthError::EmailExists,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "USER_CANCELLED" => AuthError::cancelled(message),
        _ if status.is_server_error() => AuthError::service_unavailable(message),
        _ => AuthError::Rejected(message.to_string()),
    }
}
