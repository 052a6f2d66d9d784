//! # Recommendation Orchestrator
//!
//! Coordinates one batch request end to end:
//! 1. Build a selection request from the session state
//! 2. Run catalog selection on a blocking thread
//! 3. If the batch came back under-filled in Super mode, ask the
//!    external oracle for the shortfall
//! 4. Parse the oracle reply tolerantly, drop anything the session has
//!    already seen, and append the rest
//!
//! The orchestrator never mutates session state; recording likes and
//! exclusions between batches is the caller's job.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use catalog::Movie;
use oracle::{OracleRequest, OracleResult, OracleSource, parse_oracle_text};
use recommender::{BatchRequest, MAX_BATCH_SIZE, Mode, PLACEHOLDER_IMAGE, Recommendation, select_batch};

use crate::session::SessionState;

/// Main orchestrator tying the catalog selector to the oracle top-up.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<Vec<Movie>>,
    oracle: Arc<dyn OracleSource>,
}

impl RecommendationOrchestrator {
    pub fn new(catalog: Arc<Vec<Movie>>, oracle: Arc<dyn OracleSource>) -> Self {
        Self { catalog, oracle }
    }

    /// Main entry point: produce one recommendation batch for a session.
    ///
    /// Selection is CPU-bound, so it runs on `spawn_blocking`. The result
    /// is deduplicated by movie key and honors the exclusion invariant
    /// for both local and oracle-supplied items.
    pub async fn get_batch(
        &self,
        session: &SessionState,
        mode: Mode,
        batch_size: usize,
    ) -> Result<Vec<Recommendation>> {
        let start_time = Instant::now();
        let target = batch_size.clamp(1, MAX_BATCH_SIZE);

        let request = self.build_request(session, mode, batch_size);
        let catalog = self.catalog.clone();
        let mut batch = tokio::task::spawn_blocking(move || select_batch(&catalog, &request))
            .await
            .context("Selection task panicked")?;
        info!("Selected {} of {} from catalog", batch.len(), target);

        if mode == Mode::Super && batch.len() < target {
            let shortfall = target - batch.len();
            let appended = self.top_up_from_oracle(session, &batch, mode, shortfall).await?;
            info!("Oracle top-up appended {} of {} missing", appended.len(), shortfall);
            batch.extend(appended);
        }

        info!(
            "Batch of {} ready in {:.2?} (mode: {})",
            batch.len(),
            start_time.elapsed(),
            mode
        );
        Ok(batch)
    }

    fn build_request(&self, session: &SessionState, mode: Mode, batch_size: usize) -> BatchRequest {
        BatchRequest {
            watched_keys: session.watched_keys.clone(),
            exclude_keys: session.exclude_keys.clone(),
            liked_keys: session.liked_keys.clone(),
            rating_by_key: session.rating_by_key.clone(),
            mode,
            batch_size,
            preferred_actors: session.preferred_actors.clone(),
            preferred_directors: session.preferred_directors.clone(),
        }
    }

    /// Ask the oracle for `shortfall` more movies and keep only the ones
    /// this session has not seen in any form.
    async fn top_up_from_oracle(
        &self,
        session: &SessionState,
        selected: &[Recommendation],
        mode: Mode,
        shortfall: usize,
    ) -> Result<Vec<Recommendation>> {
        let request = OracleRequest::new(
            session.watched_lines.clone(),
            session.liked_titles.clone(),
            session.exclude_titles.clone(),
            shortfall,
        );

        // Oracle implementations may block on a network call.
        let oracle = self.oracle.clone();
        let reply = tokio::task::spawn_blocking(move || oracle.recommend(&request))
            .await
            .context("Oracle task panicked")?
            .context("Oracle request failed")?;

        let movies = match parse_oracle_text(&reply, shortfall) {
            OracleResult::Ok(movies) => movies,
            OracleResult::Malformed => {
                warn!("Oracle reply was malformed; returning the local batch as-is");
                return Ok(vec![]);
            }
        };

        let mut seen_keys: HashSet<_> = selected.iter().map(|r| r.key()).collect();
        let mut appended = Vec::new();
        for movie in movies {
            let key = catalog::movie_key(&movie.title, &movie.year);
            let already_known = session.watched_keys.contains(&key)
                || session.exclude_keys.contains(&key)
                || session.liked_keys.contains(&key)
                || seen_keys.contains(&key);
            if already_known {
                continue;
            }
            seen_keys.insert(key);
            appended.push(Recommendation {
                title: movie.title,
                year: movie.year,
                director: movie.director,
                image: PLACEHOLDER_IMAGE.to_string(),
                why_it_fits: movie.why_it_fits,
                // Oracle items carry no catalog score.
                score: 0.0,
                mode,
            });
            if appended.len() == shortfall {
                break;
            }
        }
        Ok(appended)
    }
}
