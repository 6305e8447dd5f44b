//! Firebase connection configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Firebase project settings
///
/// All connection fields are optional at load time and only required when
/// the Firebase backend is selected.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseSettings {
    /// Project id, e.g. `my-project`
    pub project_id: Option<String>,

    /// Web API key of the project
    pub api_key: Option<SecretString>,

    /// Storage bucket, e.g. `my-project.appspot.com`
    pub storage_bucket: Option<String>,

    /// Google id token exchanged on "Sign in with Google"
    pub google_id_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl FirebaseSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate Firebase configuration
    ///
    /// Connection fields are checked only when `required` is set.
    pub fn validate(&self, required: bool) -> Result<(), ValidationError> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !required {
            return Ok(());
        }
        if is_blank(self.project_id.as_deref()) {
            return Err(ValidationError::MissingRequired("firebase.project_id"));
        }
        if is_blank(self.api_key.as_ref().map(|k| k.expose_secret().as_str())) {
            return Err(ValidationError::MissingRequired("firebase.api_key"));
        }
        if is_blank(self.storage_bucket.as_deref()) {
            return Err(ValidationError::MissingRequired("firebase.storage_bucket"));
        }
        Ok(())
    }
}

impl Default for FirebaseSettings {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            storage_bucket: None,
            google_id_token: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FirebaseSettings {
        FirebaseSettings {
            project_id: Some("demo".to_string()),
            api_key: Some(SecretString::new("key".to_string())),
            storage_bucket: Some("demo.appspot.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_pass_when_not_required() {
        assert!(FirebaseSettings::default().validate(false).is_ok());
    }

    #[test]
    fn test_missing_fields_fail_when_required() {
        assert_eq!(
            FirebaseSettings::default().validate(true),
            Err(ValidationError::MissingRequired("firebase.project_id"))
        );

        let config = FirebaseSettings {
            api_key: Some(SecretString::new("  ".to_string())),
            ..complete()
        };
        assert_eq!(
            config.validate(true),
            Err(ValidationError::MissingRequired("firebase.api_key"))
        );
    }

    #[test]
    fn test_complete_settings_pass() {
        assert!(complete().validate(true).is_ok());
        assert_eq!(complete().request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_timeout() {
        let config = FirebaseSettings {
            request_timeout_secs: 0,
            ..complete()
        };
        assert_eq!(config.validate(true), Err(ValidationError::InvalidTimeout));
    }
}
