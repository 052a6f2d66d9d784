//! # Taste Crate
//!
//! Converts raw watch-history signals into weighted preference profiles.
//!
//! A profile is a map from a feature name (genre, actor or director) to a
//! weight in `[0, 1]`. Profiles are built fresh per request from explicit
//! inputs and never persisted: [`build_profiles`] is pure and produces
//! identical output for identical input.
//!
//! ## Pipeline
//! 1. Weight each watched movie by its rating ([`rating_weight`])
//! 2. Accumulate raw scores per genre / actor / director
//! 3. Flat-boost features of liked-this-session movies
//! 4. Max-normalize each distribution into `[0, 1]`
//! 5. Rescale genres by taste concentration (entropy-based)
//! 6. Force explicit actor/director preferences to 1.0

pub mod profile;

pub use profile::{
    Profile, Profiles, build_profiles, entropy_norm, normalize_profile, rating_weight,
};
