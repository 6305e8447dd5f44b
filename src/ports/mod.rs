//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the controllers and the managed backend. Adapters implement these ports.
//!
//! ## Backend Ports
//!
//! - `IdentityService` - Registration, sign-in, sign-out, current session
//! - `FederatedCredentialSource` - Third-party credential for interactive sign-in
//! - `DocumentStore` - Schema-less document collections
//! - `BlobStore` - Named binary objects under path prefixes
//!
//! ## Presentation Ports
//!
//! - `UserNotifier` - User-facing outcome messages

mod blob_store;
mod document_store;
mod identity_service;
mod user_notifier;

pub use blob_store::{BlobRef, BlobStore, BlobStoreError};
pub use document_store::{Document, DocumentStore, DocumentStoreError};
pub use identity_service::{FederatedCredential, FederatedCredentialSource, IdentityService};
pub use user_notifier::{Notice, NoticeLevel, UserNotifier};
