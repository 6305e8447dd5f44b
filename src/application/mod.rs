//! Application layer - controllers the page talks to.
//!
//! Controllers orchestrate ports and hold the state the page renders from.
//! They never talk to a concrete backend directly.

pub mod auth_controller;
pub mod record_controller;

pub use auth_controller::AuthController;
pub use record_controller::{CreateRecordCommand, RecordController, RecordError, RecordLocations};
