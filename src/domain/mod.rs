//! Domain layer containing domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, session, errors)
//! - `movie` - Movie records and the pending movie draft
//! - `file` - Uploaded files and their listing entries

pub mod file;
pub mod foundation;
pub mod movie;
