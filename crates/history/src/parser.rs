//! CSV parsing for watch-history exports.

use crate::error::{HistoryError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// One normalized watch-history row.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRecord {
    pub name: String,
    /// Release year as a string; empty when the export lacks one.
    pub year: String,
    /// Parsed rating; the scale (0-5 stars vs 0-10) is not recorded by
    /// the export and is guessed later, see `taste::rating_weight`.
    pub rating: Option<f32>,
    pub date: String,
}

// Header aliases seen across export tools, in priority order.
const NAME_ALIASES: &[&str] = &["Name", "name", "Movie", "movie", "Title", "title"];
const YEAR_ALIASES: &[&str] = &["Year", "year"];
const RATING_ALIASES: &[&str] = &["Rating", "rating", "Stars", "stars", "Score", "score"];
const DATE_ALIASES: &[&str] = &["Date", "date"];

/// Parse a rating cell. Empty or non-numeric values become `None`,
/// never errors.
pub fn parse_rating(value: &str) -> Option<f32> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f32>().ok()
}

/// Load a watch-history CSV from disk.
pub fn load_history(path: &Path) -> Result<Vec<WatchRecord>> {
    let file = File::open(path)?;
    parse_history(BufReader::new(file))
}

/// Parse a watch-history CSV from any reader.
///
/// The header row is resolved against the alias lists above; a title
/// column is required, everything else is optional. Rows with an empty
/// title are skipped. Ragged rows are tolerated.
pub fn parse_history<R: Read>(reader: R) -> Result<Vec<WatchRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let name_col = find_column(&headers, NAME_ALIASES).ok_or(HistoryError::MissingTitleColumn {
        expected: "Name, Movie, Title",
    })?;
    let year_col = find_column(&headers, YEAR_ALIASES);
    let rating_col = find_column(&headers, RATING_ALIASES);
    let date_col = find_column(&headers, DATE_ALIASES);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.records() {
        let row = row?;
        let name = field(&row, Some(name_col));
        if name.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(WatchRecord {
            name,
            year: field(&row, year_col),
            rating: parse_rating(&field(&row, rating_col)),
            date: field(&row, date_col),
        });
    }

    debug!(
        "Parsed watch history: {} records, {} rows skipped without a title",
        records.len(),
        skipped
    );
    Ok(records)
}

/// Find the first header matching any alias, in alias priority order.
fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == *alias))
}

fn field(row: &StringRecord, column: Option<usize>) -> String {
    column
        .and_then(|i| row.get(i))
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating_tolerates_junk() {
        assert_eq!(parse_rating("3.5"), Some(3.5));
        assert_eq!(parse_rating(" 4 "), Some(4.0));
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("  "), None);
        assert_eq!(parse_rating("five stars"), None);
    }

    #[test]
    fn test_parse_letterboxd_style_export() {
        let csv = "Date,Name,Year,Letterboxd URI,Rating\n\
                   2024-01-02,Heat,1995,https://boxd.it/x,4.5\n\
                   2024-01-05,Ronin,1998,https://boxd.it/y,\n";
        let records = parse_history(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Heat");
        assert_eq!(records[0].year, "1995");
        assert_eq!(records[0].rating, Some(4.5));
        assert_eq!(records[0].date, "2024-01-02");
        assert_eq!(records[1].rating, None);
    }

    #[test]
    fn test_header_aliases() {
        let csv = "Movie,Stars\nHeat,5\n";
        let records = parse_history(csv.as_bytes()).unwrap();
        assert_eq!(records[0].name, "Heat");
        assert_eq!(records[0].rating, Some(5.0));
        assert_eq!(records[0].year, "");
    }

    #[test]
    fn test_rows_without_title_skipped() {
        let csv = "Name,Year\n,1995\nHeat,1995\n";
        let records = parse_history(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Heat");
    }

    #[test]
    fn test_missing_title_column_is_an_error() {
        let csv = "Year,Rating\n1995,4.0\n";
        let result = parse_history(csv.as_bytes());
        assert!(matches!(
            result,
            Err(HistoryError::MissingTitleColumn { .. })
        ));
    }

    #[test]
    fn test_ragged_rows_tolerated() {
        let csv = "Name,Year,Rating\nHeat,1995\nRonin,1998,4.0,extra\n";
        let records = parse_history(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rating, None);
        assert_eq!(records[1].rating, Some(4.0));
    }
}
