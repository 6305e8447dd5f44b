//! In-memory adapters
//!
//! Process-local implementations of the backend ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryIdentityService** - Accounts and the current session
//! - **InMemoryDocumentStore** - Document collections
//! - **InMemoryBlobStore** - Binary objects with token-bearing download URLs
//!
//! Every adapter counts the calls it receives and can be forced to fail,
//! which is what the controller tests rely on.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::memory::{InMemoryBlobStore, InMemoryDocumentStore, InMemoryIdentityService};
//!
//! let identity = Arc::new(InMemoryIdentityService::new());
//! let documents = Arc::new(InMemoryDocumentStore::new());
//! let blobs = Arc::new(InMemoryBlobStore::new());
//! ```

mod blob_store;
mod document_store;
mod identity;

pub use blob_store::InMemoryBlobStore;
pub use document_store::InMemoryDocumentStore;
pub use identity::InMemoryIdentityService;
