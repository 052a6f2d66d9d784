//! Core domain types for the candidate catalog.
//!
//! A [`Movie`] is identified everywhere in the system by its [`MovieKey`]:
//! the lowercased, trimmed title joined with the trimmed year by `"::"`.
//! Two movies with the same key are the same movie regardless of any other
//! field differences, so all set membership (watched, excluded, liked)
//! works on keys.

use serde::{Deserialize, Serialize};

/// Normalized `title::year` identity string.
pub type MovieKey = String;

/// A candidate movie from the catalog, immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    /// Release year as a string; may be empty when unknown.
    pub year: String,
    /// Genres in declaration order from the source data.
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub imdb_url: String,
    pub poster_url: String,
    /// IMDb rating on a 0-10 scale, when known.
    pub imdb_rating: Option<f32>,
}

impl Movie {
    /// Identity key for set membership comparisons.
    pub fn key(&self) -> MovieKey {
        movie_key(&self.title, &self.year)
    }

    /// Whether this movie has a displayable poster.
    pub fn has_poster(&self) -> bool {
        self.poster_url.starts_with("http")
    }
}

/// Lowercase and trim a title for key construction.
pub fn norm_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Build the `title::year` key. Title matching is case- and
/// whitespace-insensitive; the year must match exactly.
pub fn movie_key(title: &str, year: &str) -> MovieKey {
    format!("{}::{}", norm_title(title), year.trim())
}

/// Heuristic filter that drops non-Latin titles from this localized
/// deployment: keep only titles representable in plain ASCII (which
/// includes common punctuation and digits).
pub fn is_ascii_title(title: &str) -> bool {
    let t = title.trim();
    !t.is_empty() && t.is_ascii()
}
