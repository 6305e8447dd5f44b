//! Backend selection

use serde::Deserialize;

/// Which implementation of the backend ports to wire up
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local stores, lost on restart
    #[default]
    Memory,
    /// Firebase Auth, Firestore, and Firebase Storage
    Firebase,
}

/// Backend configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
}
