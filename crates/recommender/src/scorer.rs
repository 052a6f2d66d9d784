//! Candidate scoring.

use catalog::Movie;
use serde::{Deserialize, Serialize};
use std::fmt;
use taste::{Profile, Profiles};

/// Scoring policy. Regular is catalog-only and genre-driven; Super uses
/// the full profile and is diversity-aware on selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Regular,
    Super,
}

impl Mode {
    /// Tolerant parse: "super" (any case, surrounding whitespace) selects
    /// Super mode; anything else coerces to Regular.
    pub fn parse(value: &str) -> Mode {
        if value.trim().eq_ignore_ascii_case("super") {
            Mode::Super
        } else {
            Mode::Regular
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Regular => "regular",
            Mode::Super => "super",
        }
    }

    /// Score thresholds applied in order during batch selection, loosest
    /// first. Regular mode is stricter because its pool is the curated
    /// catalog; Super mode tolerates weaker matches.
    pub(crate) fn thresholds(self) -> &'static [f32] {
        match self {
            Mode::Regular => &[0.30, 0.50, 0.60, 0.60, 0.60],
            Mode::Super => &[0.25, 0.30, 0.35, 0.35, 0.35],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Scoring only looks at the top-billed credits.
const SCORE_ACTOR_LIMIT: usize = 8;
const SCORE_DIRECTOR_LIMIT: usize = 2;

const GENRE_WEIGHT: f32 = 0.78;
const ACTOR_WEIGHT: f32 = 0.12;
const DIRECTOR_WEIGHT: f32 = 0.10;

/// IMDb ratings above this baseline add to the score, below it subtract.
const IMDB_BASELINE: f32 = 8.0;
const IMDB_BONUS_PER_POINT: f32 = 0.06;

const POSTER_BONUS: f32 = 0.12;
const POSTER_PENALTY: f32 = 0.18;

/// Compute the relevance score of one candidate against the profiles.
///
/// The genre term is the mean profile weight over the movie's genres
/// (0.0 with no genres). Actor and director terms are computed only in
/// Super mode. An IMDb rating adds a linear bonus/penalty around the 8.0
/// baseline, and a displayable poster is strongly preferred. The result
/// is not clamped.
pub fn score_movie(movie: &Movie, profiles: &Profiles, mode: Mode) -> f32 {
    let genre_score = mean_weight(&profiles.genre, &movie.genres, movie.genres.len());

    let (actor_score, director_score) = match mode {
        Mode::Super => (
            mean_weight(&profiles.actor, &movie.actors, SCORE_ACTOR_LIMIT),
            mean_weight(&profiles.director, &movie.directors, SCORE_DIRECTOR_LIMIT),
        ),
        Mode::Regular => (0.0, 0.0),
    };

    let mut base =
        GENRE_WEIGHT * genre_score + ACTOR_WEIGHT * actor_score + DIRECTOR_WEIGHT * director_score;

    // Prefer highly rated, mainstream picks.
    if let Some(rating) = movie.imdb_rating {
        base += (rating.clamp(0.0, 10.0) - IMDB_BASELINE) * IMDB_BONUS_PER_POINT;
    }

    // Strongly prefer candidates we can actually display.
    if movie.has_poster() {
        base += POSTER_BONUS;
    } else {
        base -= POSTER_PENALTY;
    }

    base
}

/// Mean profile weight over the first `limit` names; 0.0 for an empty slice.
fn mean_weight(profile: &Profile, names: &[String], limit: usize) -> f32 {
    let taken = &names[..names.len().min(limit)];
    if taken.is_empty() {
        return 0.0;
    }
    let sum: f32 = taken
        .iter()
        .map(|n| profile.get(n).copied().unwrap_or(0.0))
        .sum();
    sum / taken.len() as f32
}
