//! # Recommender Crate
//!
//! Scores candidate movies against taste profiles and selects a diverse,
//! threshold-filtered batch.
//!
//! ## Components
//!
//! - **scorer**: one relevance score per candidate, with two policies
//!   ([`Mode::Regular`] is genre-driven, [`Mode::Super`] also weighs actor
//!   and director matches)
//! - **selector**: pool exclusion, iterative threshold relaxation, and the
//!   per-mode selection policy (top-N vs greedy genre diversification)
//!
//! Scores are unbounded reals and only meaningful ordinally, for ranking
//! and threshold comparison; they are never probabilities.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{BatchRequest, Mode, select_batch};
//!
//! let request = BatchRequest {
//!     watched_keys: watched,
//!     rating_by_key: ratings,
//!     mode: Mode::Super,
//!     batch_size: 12,
//!     ..BatchRequest::default()
//! };
//! let batch = select_batch(&catalog_movies, &request);
//! ```

pub mod scorer;
pub mod selector;

pub use scorer::{Mode, score_movie};
pub use selector::{BatchRequest, MAX_BATCH_SIZE, PLACEHOLDER_IMAGE, Recommendation, select_batch};
