//! Movie records.

mod draft;
mod record;

pub use draft::{coerce_release_date, MovieDraft};
pub use record::{
    Fields, Movie, MovieDecodeError, NewMovie, OWNER_FIELD, RECEIVED_AWARD_FIELD,
    RELEASE_DATE_FIELD, TITLE_FIELD,
};
