//! Per-session taste state.
//!
//! All session state is caller-owned and passed into the orchestrator
//! explicitly; nothing here is global or shared between sessions. The
//! orchestrator only reads a [`SessionState`], so recording likes and
//! exclusions between batches is the caller's job, via the mutation
//! helpers below.

use std::collections::{HashMap, HashSet};

use catalog::{MovieKey, movie_key};
use history::WatchRecord;

/// Everything the orchestrator needs to know about one user session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Keys of every movie in the imported watch history.
    pub watched_keys: HashSet<MovieKey>,
    /// Keys excluded by the caller (dismissed, hidden, already queued).
    pub exclude_keys: HashSet<MovieKey>,
    /// Keys liked earlier in this session.
    pub liked_keys: HashSet<MovieKey>,
    /// Latest rating per watched key; `None` means watched but unrated.
    pub rating_by_key: HashMap<MovieKey, Option<f32>>,
    /// Actor names whose profile weight is pinned to the maximum.
    pub preferred_actors: Vec<String>,
    /// Director names whose profile weight is pinned to the maximum.
    pub preferred_directors: Vec<String>,
    /// "Title (Year)" lines describing the watch history, for the oracle.
    pub watched_lines: Vec<String>,
    /// Display titles liked this session, for the oracle.
    pub liked_titles: Vec<String>,
    /// Display titles excluded this session, for the oracle.
    pub exclude_titles: Vec<String>,
}

impl SessionState {
    /// Seed a session from an imported watch history.
    pub fn from_history(records: &[WatchRecord]) -> Self {
        Self {
            watched_keys: history::watched_key_set(records),
            rating_by_key: history::rating_by_key(records),
            watched_lines: history::context_lines(records),
            ..Self::default()
        }
    }

    /// Record a like for a movie shown this session. Liked movies boost
    /// the taste profiles and never come back in later batches.
    pub fn record_like(&mut self, title: &str, year: &str) {
        self.liked_keys.insert(movie_key(title, year));
        self.liked_titles.push(title.to_string());
    }

    /// Record an exclusion (dismissed or already seen elsewhere).
    pub fn record_exclusion(&mut self, title: &str, year: &str) {
        self.exclude_keys.insert(movie_key(title, year));
        self.exclude_titles.push(title.to_string());
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
    fn test_from_history_seeds_keys_and_lines() {
        let records = vec![record("Heat", "1995", Some(4.5)), record("Ronin", "1998", None)];
        let session = SessionState::from_history(&records);

        assert_eq!(session.watched_keys.len(), 2);
        assert!(session.watched_keys.contains("heat::1995"));
        assert_eq!(session.rating_by_key["heat::1995"], Some(4.5));
        assert_eq!(session.rating_by_key["ronin::1998"], None);
        assert_eq!(session.watched_lines, vec!["Heat (1995)", "Ronin (1998)"]);
        assert!(session.liked_keys.is_empty());
    }

    #[test]
    fn test_record_like_and_exclusion() {
        let mut session = SessionState::default();
        session.record_like(" Heat ", "1995");
        session.record_exclusion("Ronin", "1998");

        assert!(session.liked_keys.contains("heat::1995"));
        assert!(session.exclude_keys.contains("ronin::1998"));
        assert_eq!(session.liked_titles, vec![" Heat "]);
        assert_eq!(session.exclude_titles, vec!["Ronin"]);
    }
}
