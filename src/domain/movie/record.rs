//! Movie record and its document representation.
//!
//! Movies are stored as schema-less documents. The field names below are the
//! ones existing documents already use, so they must not change.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::{MovieId, UserId};

/// Document field holding the title.
pub const TITLE_FIELD: &str = "title";
pub const RELEASE_DATE_FIELD: &str = "releaseDate";
pub const RECEIVED_AWARD_FIELD: &str = "receivedAnOscar";
pub const OWNER_FIELD: &str = "userId";

/// A document's field map.
pub type Fields = Map<String, Value>;

/// A movie as read back from the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub release_date: i64,
    pub received_award: bool,
    /// Set at creation from the signed-in user; never updated.
    pub owner_id: Option<UserId>,
}

/// A movie about to be inserted. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: i64,
    pub received_award: bool,
    pub owner_id: UserId,
}

/// Raised when a stored document cannot be read as a movie.
#[derive(Debug, Error)]
#[error("Document {id} is not a movie: {source}")]
pub struct MovieDecodeError {
    pub id: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Deserialize)]
struct MovieFields {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,

    #[serde(
        rename = "releaseDate",
        default,
        deserialize_with = "deserialize_release_date"
    )]
    release_date: i64,

    #[serde(
        rename = "receivedAnOscar",
        default,
        deserialize_with = "null_as_default"
    )]
    received_award: bool,

    #[serde(rename = "userId", default)]
    owner_id: Option<String>,
}

/// Reads an explicit null the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts integral or fractional numbers; fractions truncate toward zero
/// and null reads as 0.
fn deserialize_release_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() => Ok(f.trunc() as i64),
        _ => Err(serde::de::Error::custom("releaseDate is not a finite number")),
    }
}

impl Movie {
    /// Decodes a stored document.
    ///
    /// Missing fields take their defaults: empty title, release date 0,
    /// no award, no owner.
    pub fn from_document(id: &str, fields: &Fields) -> Result<Self, MovieDecodeError> {
        let movie_id = MovieId::new(id).map_err(|e| MovieDecodeError {
            id: id.to_string(),
            source: serde::de::Error::custom(e),
        })?;
        let decoded: MovieFields =
            serde_json::from_value(Value::Object(fields.clone())).map_err(|source| {
                MovieDecodeError {
                    id: id.to_string(),
                    source,
                }
            })?;

        Ok(Self {
            id: movie_id,
            title: decoded.title,
            release_date: decoded.release_date,
            received_award: decoded.received_award,
            owner_id: decoded.owner_id.and_then(|o| UserId::new(o).ok()),
        })
    }

    /// Partial field map that overwrites only the title.
    pub fn title_update(new_title: impl Into<String>) -> Fields {
        let mut fields = Fields::new();
        fields.insert(TITLE_FIELD.to_string(), Value::String(new_title.into()));
        fields
    }
}

impl NewMovie {
    /// Encodes the movie as a document field map.
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(TITLE_FIELD.to_string(), Value::String(self.title));
        fields.insert(
            RELEASE_DATE_FIELD.to_string(),
            Value::from(self.release_date),
        );
        fields.insert(
            RECEIVED_AWARD_FIELD.to_string(),
            Value::Bool(self.received_award),
        );
        fields.insert(
            OWNER_FIELD.to_string(),
            Value::String(self.owner_id.as_str().to_string()),
        );
        fields
    }
}
