//! HTTP adapter - the server-rendered form page.
//!
//! A single page shows the session, the movie list, and the file list, with
//! one form per operation. Forms post and are redirected back (303) so a
//! reload never resubmits.

mod dto;
mod handlers;
mod routes;
mod state;
mod views;

pub use routes::app_router;
pub use state::AppState;
