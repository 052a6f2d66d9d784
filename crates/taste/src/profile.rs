//! Preference profile construction.

use catalog::{Movie, MovieKey};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Mapping from feature name to preference weight in `[0, 1]`.
pub type Profile = HashMap<String, f32>;

/// The three profiles built for one scoring session.
#[derive(Debug, Clone, Default)]
pub struct Profiles {
    pub genre: Profile,
    pub actor: Profile,
    pub director: Profile,
}

// Only the top-billed credits carry signal; deep cast lists are noise.
const ACTOR_CREDIT_LIMIT: usize = 6;
const DIRECTOR_CREDIT_LIMIT: usize = 2;

const ACTOR_WEIGHT: f32 = 0.5;
const DIRECTOR_WEIGHT: f32 = 0.9;

// Liked-this-session movies get flat boosts, independent of any rating.
const LIKED_GENRE_BOOST: f32 = 0.8;
const LIKED_ACTOR_BOOST: f32 = 0.5;
const LIKED_DIRECTOR_BOOST: f32 = 0.9;

/// Convert a watch-history rating into a multiplier for preference
/// aggregation. Unknown rating -> 1.0.
///
/// The scale of the rating is guessed from magnitude: values <= 5.0 are
/// read as a 0-5 star rating, larger values as a 0-10 rating; both map
/// linearly onto `[0.75, 1.35]`. Known ambiguity: a genuine "5 out of 10"
/// is indistinguishable from five stars and gets the five-star weight.
/// The breakpoint is preserved exactly for compatibility with existing
/// history exports.
pub fn rating_weight(rating: Option<f32>) -> f32 {
    let Some(r) = rating else {
        return 1.0;
    };
    if r <= 5.0 {
        // Map 0..5 -> 0.75..1.35
        0.75 + (r.clamp(0.0, 5.0) / 5.0) * 0.60
    } else {
        // Map 0..10 -> 0.75..1.35
        0.75 + (r.clamp(0.0, 10.0) / 10.0) * 0.60
    }
}

/// Max-normalize a raw score distribution into `[0, 1]`.
///
/// The top entry becomes 1.0. An empty map stays empty; an all-zero (or
/// negative-max) map comes back with every value set to 0.0.
pub fn normalize_profile(raw: &Profile) -> Profile {
    if raw.is_empty() {
        return Profile::new();
    }
    let max_v = raw.values().cloned().fold(f32::MIN, f32::max);
    if max_v <= 0.0 {
        return raw.keys().map(|k| (k.clone(), 0.0)).collect();
    }
    raw.iter()
        .map(|(k, v)| (k.clone(), (v / max_v).clamp(0.0, 1.0)))
        .collect()
}

/// Normalized Shannon entropy of a distribution, in `[0, 1]`
/// (higher = more diverse). Defined as 0 when fewer than two distinct
/// entries carry positive weight.
pub fn entropy_norm(dist: &Profile) -> f32 {
    let total: f32 = dist.values().map(|v| v.max(0.0)).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let probs: Vec<f32> = dist
        .values()
        .filter(|v| **v > 0.0)
        .map(|v| v / total)
        .collect();
    if probs.is_empty() {
        return 0.0;
    }
    let h: f32 = -probs.iter().map(|p| p * p.ln()).sum::<f32>();
    let h_max = if probs.len() > 1 {
        (probs.len() as f32).ln()
    } else {
        1.0
    };
    (h / h_max).clamp(0.0, 1.0)
}

/// Build the genre/actor/director profiles for one scoring session.
///
/// Watched keys missing from the catalog index contribute nothing; a
/// history that maps to no catalog entry yields empty profiles, which is
/// a weak signal, not an error.
///
/// ## Algorithm
/// 1. For each watched movie: add its rating weight to each genre, half
///    of it to the first 6 actors, 0.9 of it to the first 2 directors
/// 2. For each liked movie: flat boosts (0.8 / 0.5 / 0.9) to the same
///    feature slices
/// 3. Max-normalize each raw distribution
/// 4. Genres only: rescale by `0.75 + 0.25 * concentration`, where
///    concentration is one minus the normalized entropy of the RAW genre
///    distribution, so a history concentrated on few genres amplifies
///    them relative to a broad one
/// 5. Explicit preferred actors/directors are force-set to 1.0 last, so
///    they always win
pub fn build_profiles(
    watched_keys: &HashSet<MovieKey>,
    rating_by_key: &HashMap<MovieKey, Option<f32>>,
    movie_index: &HashMap<MovieKey, &Movie>,
    liked_keys: &HashSet<MovieKey>,
    preferred_actors: &[String],
    preferred_directors: &[String],
) -> Profiles {
    let mut genre_raw = Profile::new();
    let mut actor_raw = Profile::new();
    let mut director_raw = Profile::new();

    for key in watched_keys {
        let Some(movie) = movie_index.get(key) else {
            continue;
        };
        let w = rating_weight(rating_by_key.get(key).copied().flatten());
        for g in &movie.genres {
            *genre_raw.entry(g.clone()).or_insert(0.0) += w;
        }
        for a in movie.actors.iter().take(ACTOR_CREDIT_LIMIT) {
            *actor_raw.entry(a.clone()).or_insert(0.0) += w * ACTOR_WEIGHT;
        }
        for d in movie.directors.iter().take(DIRECTOR_CREDIT_LIMIT) {
            *director_raw.entry(d.clone()).or_insert(0.0) += w * DIRECTOR_WEIGHT;
        }
    }

    // Feedback: liked movies boost their features regardless of rating.
    for key in liked_keys {
        let Some(movie) = movie_index.get(key) else {
            continue;
        };
        for g in &movie.genres {
            *genre_raw.entry(g.clone()).or_insert(0.0) += LIKED_GENRE_BOOST;
        }
        for a in movie.actors.iter().take(ACTOR_CREDIT_LIMIT) {
            *actor_raw.entry(a.clone()).or_insert(0.0) += LIKED_ACTOR_BOOST;
        }
        for d in movie.directors.iter().take(DIRECTOR_CREDIT_LIMIT) {
            *director_raw.entry(d.clone()).or_insert(0.0) += LIKED_DIRECTOR_BOOST;
        }
    }

    if genre_raw.is_empty() {
        debug!("Degenerate taste profile: no watched/liked key maps to the catalog");
    }

    let mut genre_profile = normalize_profile(&genre_raw);
    let mut actor_profile = normalize_profile(&actor_raw);
    let mut director_profile = normalize_profile(&director_raw);

    // Concentration adjustment on the raw (pre-normalization) genre
    // distribution: concentrated taste keeps the full weights, diverse
    // taste is damped toward 0.75.
    let concentration = 1.0 - entropy_norm(&genre_raw);
    for weight in genre_profile.values_mut() {
        *weight = (*weight * (0.75 + 0.25 * concentration)).clamp(0.0, 1.0);
    }

    // Explicit preferences override everything computed above.
    for a in preferred_actors {
        let name = a.trim();
        if !name.is_empty() {
            actor_profile.insert(name.to_string(), 1.0);
        }
    }
    for d in preferred_directors {
        let name = d.trim();
        if !name.is_empty() {
            director_profile.insert(name.to_string(), 1.0);
        }
    }

    Profiles {
        genre: genre_profile,
        actor: actor_profile,
        director: director_profile,
    }
}
