//! Fireform - movie catalogue and file drop over a managed backend
//!
//! Users sign up or sign in, keep a shared list of movies in a document
//! store, and upload files to a blob store. Controllers talk to the backend
//! only through ports, so the same page runs against Firebase or entirely
//! in memory.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
