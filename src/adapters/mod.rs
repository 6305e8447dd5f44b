//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the controllers to external systems:
//! - `firebase` - REST adapters for the managed backend
//! - `memory` - In-memory fakes for tests and local runs
//! - `notify` - User notice delivery
//! - `http` - The form page

pub mod firebase;
pub mod http;
pub mod memory;
pub mod notify;

pub use firebase::{
    FirebaseBlobStore, FirebaseConfig, FirebaseIdentityService, FirestoreDocumentStore,
    IdTokenSource, StaticCredentialSource,
};
pub use self::http::{app_router, AppState};
pub use memory::{InMemoryBlobStore, InMemoryDocumentStore, InMemoryIdentityService};
pub use notify::FlashNotifier;
