//! Batch selection.
//!
//! Turns the catalog plus one session's watch state into an ordered batch
//! of recommendations:
//!
//! 1. Build taste profiles from the watched/liked keys
//! 2. Drop watched, excluded, and liked-this-session candidates
//! 3. Score the remaining pool once (in parallel)
//! 4. Iteratively tighten a score threshold while enough candidates
//!    remain, degrading to "best available" when the pool is thin
//! 5. Regular mode takes the top N by score; Super mode greedily
//!    diversifies across genres before taking N
//!
//! Selection never fails for well-formed input: an under-filled pool
//! simply produces a shorter batch.

use crate::scorer::{Mode, score_movie};
use catalog::{Movie, MovieKey, index_by_key, movie_key};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use taste::{Profile, Profiles, build_profiles};
use tracing::{debug, instrument};

/// Upper bound on the requested batch size.
pub const MAX_BATCH_SIZE: usize = 60;

/// Sentinel image used when a selected movie has no poster URL.
pub const PLACEHOLDER_IMAGE: &str = "logo.svg";

/// Per-pick penalty applied for each already-selected movie sharing a
/// genre, in Super mode.
const DIVERSITY_PENALTY: f32 = 0.03;

/// One session's inputs to batch selection. All state is caller-owned and
/// passed explicitly; selection reads it and mutates nothing.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub watched_keys: HashSet<MovieKey>,
    pub exclude_keys: HashSet<MovieKey>,
    /// Movies liked earlier in this session: they boost the profiles but
    /// are never re-recommended in the same call.
    pub liked_keys: HashSet<MovieKey>,
    pub rating_by_key: HashMap<MovieKey, Option<f32>>,
    pub mode: Mode,
    pub batch_size: usize,
    pub preferred_actors: Vec<String>,
    pub preferred_directors: Vec<String>,
}

/// One selected movie, formatted for the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub year: String,
    /// First credited director, or empty.
    pub director: String,
    /// Poster URL, or the placeholder sentinel.
    pub image: String,
    pub why_it_fits: String,
    /// Ordinal relevance score, rounded to 4 decimals for display.
    pub score: f32,
    pub mode: Mode,
}

impl Recommendation {
    /// Identity key, matching catalog keys.
    pub fn key(&self) -> MovieKey {
        movie_key(&self.title, &self.year)
    }
}

/// Select a recommendation batch from the catalog for one session.
///
/// `batch_size` is clamped to `[1, 60]`. The result honors the exclusion
/// invariant: no returned movie's key is watched, excluded, or liked in
/// this session.
#[instrument(skip_all, fields(mode = %request.mode, batch_size = request.batch_size))]
pub fn select_batch(catalog: &[Movie], request: &BatchRequest) -> Vec<Recommendation> {
    let batch_size = request.batch_size.clamp(1, MAX_BATCH_SIZE);

    let movie_index = index_by_key(catalog);
    let profiles = build_profiles(
        &request.watched_keys,
        &request.rating_by_key,
        &movie_index,
        &request.liked_keys,
        &request.preferred_actors,
        &request.preferred_directors,
    );

    // Triple exclusion: watched, excluded, and liked-this-session keys
    // are all ineligible.
    let pool: Vec<&Movie> = catalog
        .iter()
        .filter(|m| {
            let key = m.key();
            !request.watched_keys.contains(&key)
                && !request.exclude_keys.contains(&key)
                && !request.liked_keys.contains(&key)
        })
        .collect();
    debug!("Eligible pool: {} of {} catalog movies", pool.len(), catalog.len());

    // Score the whole pool once.
    let scored: Vec<(&Movie, f32)> = pool
        .par_iter()
        .map(|m| (*m, score_movie(m, &profiles, request.mode)))
        .collect();

    let mut working = relax_thresholds(scored, request.mode.thresholds(), batch_size);
    working.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let selected = match request.mode {
        Mode::Regular => {
            working.truncate(batch_size);
            working
        }
        Mode::Super => diversify(&working, batch_size),
    };

    debug!("Selected {} of {} requested", selected.len(), batch_size);
    selected
        .into_iter()
        .map(|(movie, score)| format_item(movie, score, &profiles.genre, request.mode))
        .collect()
}

/// Iterative threshold relaxation.
///
/// Walks the threshold table loosest-first. A tighter filter is adopted
/// when it still holds at least `batch_size` candidates. When the working
/// set itself never reached `batch_size`, any non-empty filter is adopted
/// so a thin pool still yields its best few candidates; an empty filter
/// is always discarded, so the set never collapses to nothing while any
/// candidate passed an earlier tier.
fn relax_thresholds<'a>(
    scored: Vec<(&'a Movie, f32)>,
    thresholds: &[f32],
    batch_size: usize,
) -> Vec<(&'a Movie, f32)> {
    let mut working = scored;
    for &threshold in thresholds {
        let filtered: Vec<(&Movie, f32)> = working
            .iter()
            .copied()
            .filter(|(_, score)| *score >= threshold)
            .collect();
        if filtered.len() >= batch_size {
            working = filtered;
        } else if !filtered.is_empty() && working.len() < batch_size {
            // Under-filled either way; prefer the candidates that cleared
            // the bar over keeping sub-threshold ones.
            working = filtered;
        }
        // Otherwise the tighter filter would cost us a full batch (or
        // everything); keep the previous working set.
    }
    working
}

/// Greedy diversified selection for Super mode.
///
/// Walks the score-sorted list, penalizing each candidate by 0.03 per
/// already-selected movie sharing one of its genres, then re-sorts the
/// chosen set by adjusted score for presentation stability. The re-sort
/// can reorder picks relative to raw score order.
fn diversify<'a>(working: &[(&'a Movie, f32)], batch_size: usize) -> Vec<(&'a Movie, f32)> {
    let mut genre_counts: HashMap<&str, usize> = HashMap::new();
    let mut selected: Vec<(&Movie, f32)> = Vec::with_capacity(batch_size.min(working.len()));

    for &(movie, score) in working {
        if selected.len() >= batch_size {
            break;
        }
        let penalty: f32 = movie
            .genres
            .iter()
            .map(|g| DIVERSITY_PENALTY * genre_counts.get(g.as_str()).copied().unwrap_or(0) as f32)
            .sum();
        selected.push((movie, score - penalty));
        for genre in &movie.genres {
            *genre_counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }

    selected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    selected
}

fn format_item(movie: &Movie, score: f32, genre_profile: &Profile, mode: Mode) -> Recommendation {
    Recommendation {
        title: movie.title.clone(),
        year: movie.year.clone(),
        director: movie.directors.first().cloned().unwrap_or_default(),
        image: if movie.poster_url.is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            movie.poster_url.clone()
        },
        why_it_fits: why_it_fits(movie, genre_profile),
        score: round4(score),
        mode,
    }
}

/// Phrase the match explanation from the top two of the movie's genres by
/// profile weight. Empty unless the profile has nonzero weight on at
/// least one of them.
fn why_it_fits(movie: &Movie, genre_profile: &Profile) -> String {
    if movie.genres.is_empty() || genre_profile.is_empty() {
        return String::new();
    }
    let mut weighted: Vec<(&str, f32)> = movie
        .genres
        .iter()
        .map(|g| (g.as_str(), genre_profile.get(g).copied().unwrap_or(0.0)))
        .collect();
    if !weighted.iter().any(|(_, w)| *w > 0.0) {
        return String::new();
    }
    // Stable sort keeps the movie's declaration order on weight ties.
    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    let names: Vec<&str> = weighted
        .iter()
        .take(2)
        .map(|(g, _)| *g)
        .filter(|g| !g.is_empty())
        .collect();
    if names.is_empty() {
        return String::new();
    }
    format!("Strong match for your {} taste.", names.join(", "))
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}
