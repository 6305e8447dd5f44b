//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the session snapshot, and error types
//! that form the vocabulary of the Fireform domain.

mod auth;
mod errors;
mod ids;

pub use auth::{AuthError, Credentials, Session};
pub use errors::ValidationError;
pub use ids::{MovieId, UserId};
