//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FIREFORM` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use fireform::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod backend;
mod error;
mod firebase;
mod server;
mod store;

pub use backend::{BackendConfig, BackendKind};
pub use error::{ConfigError, ValidationError};
pub use firebase::FirebaseSettings;
pub use server::{Environment, ServerConfig};
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// in-memory configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, log level)
    #[serde(default)]
    pub server: ServerConfig,

    /// Which backend to wire up
    #[serde(default)]
    pub backend: BackendConfig,

    /// Firebase project settings
    #[serde(default)]
    pub firebase: FirebaseSettings,

    /// Collection and prefix names
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FIREFORM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FIREFORM__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FIREFORM__BACKEND__KIND=firebase` -> `backend.kind = firebase`
    /// - `FIREFORM__FIREBASE__API_KEY=...` -> `firebase.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FIREFORM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Firebase connection fields are required only when the Firebase
    /// backend is selected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.firebase
            .validate(self.backend.kind == BackendKind::Firebase)?;
        self.store.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "FIREFORM__SERVER__PORT",
        "FIREFORM__SERVER__ENVIRONMENT",
        "FIREFORM__BACKEND__KIND",
        "FIREFORM__FIREBASE__PROJECT_ID",
        "FIREFORM__FIREBASE__API_KEY",
        "FIREFORM__FIREBASE__STORAGE_BUCKET",
        "FIREFORM__STORE__MOVIES_COLLECTION",
    ];

    /// Helper to set the Firebase connection variables
    fn set_firebase_env() {
        env::set_var("FIREFORM__BACKEND__KIND", "firebase");
        env::set_var("FIREFORM__FIREBASE__PROJECT_ID", "demo-project");
        env::set_var("FIREFORM__FIREBASE__API_KEY", "web-key");
        env::set_var("FIREFORM__FIREBASE__STORAGE_BUCKET", "demo-project.appspot.com");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_yields_memory_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.movies_collection, "movies");
        assert_eq!(config.store.files_prefix, "projectFiles");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_firebase_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_firebase_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.backend.kind, BackendKind::Firebase);
        assert_eq!(config.firebase.project_id.as_deref(), Some("demo-project"));
        assert_eq!(
            config.firebase.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("web-key")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_firebase_backend_requires_project() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("FIREFORM__BACKEND__KIND", "firebase");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("firebase.project_id"))
        );
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FIREFORM__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_port_and_collection() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FIREFORM__SERVER__PORT", "8080");
        env::set_var("FIREFORM__STORE__MOVIES_COLLECTION", "films");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.locations().movies_collection, "films");
    }
}
