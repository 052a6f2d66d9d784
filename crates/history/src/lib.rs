//! # History Crate
//!
//! Parses an uploaded watch-history export (Letterboxd-style CSV) into
//! normalized [`WatchRecord`]s and derives the inputs the taste profiler
//! needs: the watched key set, the per-key rating map, and human-readable
//! "Title (Year)" context lines.
//!
//! Column headers vary between export tools, so lookup goes through
//! alias lists (`Name`/`Movie`/`Title`, `Rating`/`Stars`/`Score`, ...)
//! rather than a fixed schema. Rows without a usable title are skipped;
//! unparseable ratings become absent, never errors.

pub mod error;
pub mod parser;

pub use error::{HistoryError, Result};
pub use parser::{WatchRecord, load_history, parse_history, parse_rating};

use catalog::{MovieKey, movie_key};
use std::collections::{HashMap, HashSet};

/// Keys of every watched movie, deduplicated.
pub fn watched_key_set(records: &[WatchRecord]) -> HashSet<MovieKey> {
    records.iter().map(|r| r.key()).collect()
}

/// Rating per watched key. Rewatches keep the last rating seen, matching
/// the order of the export.
pub fn rating_by_key(records: &[WatchRecord]) -> HashMap<MovieKey, Option<f32>> {
    let mut ratings = HashMap::with_capacity(records.len());
    for record in records {
        ratings.insert(record.key(), record.rating);
    }
    ratings
}

/// Build "Title (Year)" lines for use as external-oracle context.
pub fn context_lines(records: &[WatchRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            if r.year.is_empty() {
                r.name.clone()
            } else {
                format!("{} ({})", r.name, r.year)
            }
        })
        .collect()
}

impl WatchRecord {
    /// Identity key of the watched movie, matching catalog keys.
    pub fn key(&self) -> MovieKey {
        movie_key(&self.name, &self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, year: &str, rating: Option<f32>) -> WatchRecord {
        WatchRecord {
            name: name.to_string(),
            year: year.to_string(),
            rating,
            date: String::new(),
        }
    }

    #[test]
    fn test_watched_key_set_deduplicates() {
        let records = vec![
            record("Heat", "1995", Some(4.5)),
            record("HEAT", "1995", Some(5.0)),
            record("Ronin", "1998", None),
        ];
        let keys = watched_key_set(&records);
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("heat::1995"));
        assert!(keys.contains("ronin::1998"));
    }

    #[test]
    fn test_rating_by_key_last_rating_wins() {
        let records = vec![
            record("Heat", "1995", Some(3.0)),
            record("Heat", "1995", Some(4.5)),
        ];
        let ratings = rating_by_key(&records);
        assert_eq!(ratings["heat::1995"], Some(4.5));
    }

    #[test]
    fn test_context_lines_omit_missing_year() {
        let records = vec![record("Heat", "1995", None), record("Dune", "", None)];
        assert_eq!(context_lines(&records), vec!["Heat (1995)", "Dune"]);
    }
}
