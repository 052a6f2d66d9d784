//! Catalog loading.
//!
//! Loads the fixed candidate movie catalog from a JSON array of records,
//! filters it down to entries the recommender can actually display, and
//! ranks the remainder into a bounded working set.
//!
//! Filtering rules (both must pass):
//! 1. The title must be plain ASCII (non-Latin titles are deliberately
//!    excluded from this localized deployment).
//! 2. The poster URL must be present and look like an absolute HTTP(S) URL.
//!
//! The survivors are sorted by IMDb rating descending (missing treated as
//! 0.0) and truncated to the top [`CATALOG_LIMIT`] entries. The result is
//! deterministic for identical input: the sort is stable, so rating ties
//! keep their input order.

use crate::error::{CatalogError, Result};
use crate::types::{Movie, is_ascii_title};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Maximum number of candidates kept after ranking, approximating the
/// IMDb "Top 100" pool the original deployment asked for.
pub const CATALOG_LIMIT: usize = 100;

/// Raw catalog record as it appears in the JSON data file. Every field is
/// optional here; validation happens during conversion to [`Movie`].
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    actors: Vec<String>,
    #[serde(default)]
    directors: Vec<String>,
    #[serde(default)]
    imdb_url: String,
    #[serde(default)]
    poster_url: String,
    #[serde(default)]
    imdb_rating: Option<f32>,
}

impl RawRecord {
    fn into_movie(self) -> Movie {
        fn clean(values: Vec<String>) -> Vec<String> {
            values
                .into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        }

        Movie {
            title: self.title.trim().to_string(),
            year: self.year.trim().to_string(),
            genres: clean(self.genres),
            actors: clean(self.actors),
            directors: clean(self.directors),
            imdb_url: self.imdb_url.trim().to_string(),
            poster_url: self.poster_url.trim().to_string(),
            imdb_rating: self.imdb_rating,
        }
    }
}

/// Load the catalog from a JSON file on disk.
pub fn load_catalog(path: &Path) -> Result<Vec<Movie>> {
    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    catalog_from_value(raw)
}

/// Parse the catalog from an in-memory JSON string.
pub fn parse_catalog(json: &str) -> Result<Vec<Movie>> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    catalog_from_value(raw)
}

fn catalog_from_value(raw: serde_json::Value) -> Result<Vec<Movie>> {
    let records = match raw {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(CatalogError::InvalidData(format!(
                "expected a JSON array of movie records, got {}",
                json_type_name(&other)
            )));
        }
    };

    let total = records.len();
    let mut movies: Vec<Movie> = Vec::with_capacity(total);
    for record in records {
        // A single bad record is skipped, not fatal.
        let raw: RawRecord = match serde_json::from_value(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping malformed catalog record: {}", e);
                continue;
            }
        };
        let movie = raw.into_movie();

        if !is_ascii_title(&movie.title) {
            continue;
        }
        if !movie.has_poster() {
            // Entries without a displayable poster are excluded up front.
            continue;
        }
        movies.push(movie);
    }

    // Rank by IMDb rating descending; stable sort keeps input order on ties.
    movies.sort_by(|a, b| {
        let ra = a.imdb_rating.unwrap_or(0.0);
        let rb = b.imdb_rating.unwrap_or(0.0);
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    movies.truncate(CATALOG_LIMIT);

    debug!(
        "Loaded catalog: {} of {} records kept after filtering and ranking",
        movies.len(),
        total
    );
    Ok(movies)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
