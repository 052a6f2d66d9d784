//! # Oracle Crate
//!
//! Models the external LLM-backed recommendation oracle as an opaque,
//! injectable source of loosely structured text. This crate owns:
//! - the [`OracleSource`] trait the orchestration layer calls through
//! - the request shape ([`OracleRequest`]) with its context-size caps
//! - a tolerant parser ([`parse_oracle_text`]) that extracts discrete
//!   `{title, year, director}` records from the reply and discards
//!   partial or unparseable groups
//!
//! No network code lives here; the process boundary (HTTP, prompts,
//! retries) belongs to whoever implements [`OracleSource`].

pub mod parser;

pub use parser::{OracleMovie, OracleResult, parse_oracle_text};

use anyhow::Result;

// The original deployment keeps prompts and replies small to avoid
// truncation; these caps mirror it.
const MAX_ORACLE_COUNT: usize = 50;
const MAX_WATCHED_LINES: usize = 260;
const MAX_LIKED_LINES: usize = 120;
const MAX_EXCLUDE_LINES: usize = 220;

/// One request to the external oracle: taste context plus how many
/// supplementary candidates are wanted.
#[derive(Debug, Clone, Default)]
pub struct OracleRequest {
    /// "Title (Year)" lines for the watched history.
    pub watched_lines: Vec<String>,
    /// Titles liked this session, used as taste signal.
    pub liked_titles: Vec<String>,
    /// Titles that must not come back (may be partial titles).
    pub exclude_titles: Vec<String>,
    pub count: usize,
}

impl OracleRequest {
    /// Build a request with the count and context-line caps applied.
    pub fn new(
        watched_lines: Vec<String>,
        liked_titles: Vec<String>,
        exclude_titles: Vec<String>,
        count: usize,
    ) -> Self {
        let mut request = Self {
            watched_lines,
            liked_titles,
            exclude_titles,
            count: count.clamp(1, MAX_ORACLE_COUNT),
        };
        request.watched_lines.truncate(MAX_WATCHED_LINES);
        request.liked_titles.truncate(MAX_LIKED_LINES);
        request.exclude_titles.truncate(MAX_EXCLUDE_LINES);
        request
    }
}

/// An external recommendation source. Implementations own the transport
/// (and any caching or serialization of concurrent calls); the contract
/// here is only "request in, raw reply text out".
pub trait OracleSource: Send + Sync {
    fn recommend(&self, request: &OracleRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_caps_count() {
        let request = OracleRequest::new(vec![], vec![], vec![], 500);
        assert_eq!(request.count, 50);

        let request = OracleRequest::new(vec![], vec![], vec![], 0);
        assert_eq!(request.count, 1);
    }

    #[test]
    fn test_request_caps_context_lines() {
        let lines: Vec<String> = (0..400).map(|i| format!("Movie {i}")).collect();
        let request = OracleRequest::new(lines.clone(), lines.clone(), lines, 10);
        assert_eq!(request.watched_lines.len(), 260);
        assert_eq!(request.liked_titles.len(), 120);
        assert_eq!(request.exclude_titles.len(), 220);
    }
}
