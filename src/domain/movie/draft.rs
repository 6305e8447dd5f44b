//! Pending movie input.
//!
//! Mirrors the values of the "new movie" form while the user is typing.
//! Drafts are owned by the presentation layer and are not cleared after a
//! successful submission.

/// Values typed into the "new movie" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
    pub release_date: i64,
    pub received_award: bool,
}

impl MovieDraft {
    /// Updates the release date from raw form text.
    pub fn set_release_date_text(&mut self, text: &str) {
        self.release_date = coerce_release_date(text);
    }
}

/// Coerces numeric form text to an integer year.
///
/// Whitespace is ignored, empty text is 0, fractional values truncate
/// toward zero, and anything non-numeric is 0.
pub fn coerce_release_date(text: &str) -> i64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    if let Ok(n) = text.parse::<i64>() {
        return n;
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}
