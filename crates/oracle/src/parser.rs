//! Tolerant parsing of oracle reply text.
//!
//! The oracle replies with a loosely delimited text block: movie groups
//! separated by `#`, each group a handful of `key: value` lines.
//! Expected shape (repeated):
//!
//! ```text
//! Title: ...
//! Year: ...
//! Director: ...
//! why it fits: ...
//! ```
//!
//! Replies are often wrapped in Markdown code fences and sometimes
//! contain partial groups; parsing is tolerant, not schema validation.
//! Groups without a title are discarded.

use tracing::debug;

/// One supplementary movie extracted from oracle text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleMovie {
    pub title: String,
    /// 4-digit year string when the oracle knew one, otherwise empty.
    pub year: String,
    pub director: String,
    pub why_it_fits: String,
}

/// Outcome of parsing an oracle reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleResult {
    /// At least the overall shape was usable; holds every complete group.
    Ok(Vec<OracleMovie>),
    /// Empty reply or an error message instead of recommendations.
    Malformed,
}

impl OracleResult {
    /// The parsed movies, or an empty slice for a malformed reply.
    pub fn movies(&self) -> &[OracleMovie] {
        match self {
            OracleResult::Ok(movies) => movies,
            OracleResult::Malformed => &[],
        }
    }
}

/// Parse oracle reply text into discrete movie records, keeping at most
/// `max_movies` groups.
pub fn parse_oracle_text(text: &str, max_movies: usize) -> OracleResult {
    if text.trim().is_empty() || text.contains("Error:") {
        return OracleResult::Malformed;
    }

    let cleaned = strip_code_fence(text.trim());

    let mut movies = Vec::new();
    for block in cleaned.split('#') {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        if movies.len() >= max_movies {
            break;
        }
        if let Some(movie) = parse_block(block) {
            movies.push(movie);
        }
    }

    debug!("Parsed {} movies from oracle reply", movies.len());
    OracleResult::Ok(movies)
}

/// Drop a leading Markdown code fence (and its closing fence) if present.
fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    // Content sits after the opening fence line; a trailing fence may or
    // may not be there.
    let mut remainder = text;
    if let Some((_, rest)) = remainder.split_once('\n') {
        remainder = rest;
    }
    remainder.trim_end_matches('`').trim()
}

fn parse_block(block: &str) -> Option<OracleMovie> {
    let mut title = String::new();
    let mut year = String::new();
    let mut director = String::new();
    let mut why_it_fits = String::new();

    for raw_line in block.lines() {
        let line = raw_line.trim();
        let lower = line.to_lowercase();

        if let Some(value) = prefixed_value(line, &lower, "title:") {
            title = value;
        } else if let Some(value) = prefixed_value(line, &lower, "year:") {
            year = value;
        } else if let Some(value) = prefixed_value(line, &lower, "director:") {
            director = value;
        } else if lower.contains("why it fits")
            && let Some((_, value)) = line.split_once(':')
        {
            why_it_fits = value.trim().to_string();
        }
    }

    if title.is_empty() {
        // Partial group; discard.
        return None;
    }
    Some(OracleMovie {
        title,
        year,
        director,
        why_it_fits,
    })
}

fn prefixed_value(line: &str, lower: &str, prefix: &str) -> Option<String> {
    if lower.starts_with(prefix) {
        Some(line[prefix.len()..].trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "\
Title: Heat
Year: 1995
Director: Michael Mann
why it fits: Slow-burn crime epic.
#
Title: Ronin
Year: 1998
Director: John Frankenheimer
why it fits: Methodical action.
";

    #[test]
    fn test_parses_hash_separated_groups() {
        let result = parse_oracle_text(REPLY, 10);
        let movies = result.movies();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Heat");
        assert_eq!(movies[0].year, "1995");
        assert_eq!(movies[0].director, "Michael Mann");
        assert_eq!(movies[0].why_it_fits, "Slow-burn crime epic.");
        assert_eq!(movies[1].title, "Ronin");
    }

    #[test]
    fn test_strips_code_fence() {
        let fenced = format!("```\n{REPLY}\n```");
        let result = parse_oracle_text(&fenced, 10);
        assert_eq!(result.movies().len(), 2);
    }

    #[test]
    fn test_key_matching_is_case_insensitive() {
        let text = "TITLE: Heat\nYEAR: 1995\nDIRECTOR: Michael Mann";
        let movies = match parse_oracle_text(text, 10) {
            OracleResult::Ok(movies) => movies,
            OracleResult::Malformed => panic!("reply should parse"),
        };
        assert_eq!(movies[0].title, "Heat");
        assert_eq!(movies[0].director, "Michael Mann");
    }

    #[test]
    fn test_discards_groups_without_title() {
        let text = "Year: 1995\nDirector: Nobody\n#\nTitle: Ronin\nYear: 1998";
        let result = parse_oracle_text(text, 10);

        assert_eq!(result.movies().len(), 1);
        assert_eq!(result.movies()[0].title, "Ronin");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let result = parse_oracle_text("Title: Dune", 10);
        let movie = &result.movies()[0];
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.year, "");
        assert_eq!(movie.director, "");
        assert_eq!(movie.why_it_fits, "");
    }

    #[test]
    fn test_caps_at_max_movies() {
        let result = parse_oracle_text(REPLY, 1);
        assert_eq!(result.movies().len(), 1);
    }

    #[test]
    fn test_empty_and_error_replies_are_malformed() {
        assert_eq!(parse_oracle_text("", 10), OracleResult::Malformed);
        assert_eq!(parse_oracle_text("   \n ", 10), OracleResult::Malformed);
        assert_eq!(
            parse_oracle_text("Error: model unavailable", 10),
            OracleResult::Malformed
        );
    }

    #[test]
    fn test_unstructured_noise_yields_empty_ok() {
        let result = parse_oracle_text("Sure! Here are some movies you might enjoy.", 10);
        assert_eq!(result, OracleResult::Ok(vec![]));
    }
}
