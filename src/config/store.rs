//! Storage locations

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::RecordLocations;

/// Where movies and files live in the backend
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Document collection holding movies
    #[serde(default = "default_movies_collection")]
    pub movies_collection: String,

    /// Blob prefix files are uploaded under
    #[serde(default = "default_files_prefix")]
    pub files_prefix: String,
}

impl StoreConfig {
    pub fn locations(&self) -> RecordLocations {
        RecordLocations {
            movies_collection: self.movies_collection.clone(),
            files_prefix: self.files_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Validate storage locations
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.movies_collection.is_empty() || self.movies_collection.contains('/') {
            return Err(ValidationError::InvalidLocation("store.movies_collection"));
        }
        if self.files_prefix.trim_end_matches('/').is_empty() {
            return Err(ValidationError::InvalidLocation("store.files_prefix"));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            movies_collection: default_movies_collection(),
            files_prefix: default_files_prefix(),
        }
    }
}

fn default_movies_collection() -> String {
    "movies".to_string()
}

fn default_files_prefix() -> String {
    "projectFiles".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_record_locations() {
        assert_eq!(StoreConfig::default().locations(), RecordLocations::default());
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = StoreConfig {
            files_prefix: "uploads/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.locations().files_prefix, "uploads");
    }

    #[test]
    fn test_invalid_locations() {
        let config = StoreConfig {
            movies_collection: "a/b".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StoreConfig {
            files_prefix: "/".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
