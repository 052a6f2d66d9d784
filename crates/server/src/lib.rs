//! Server crate for the taste-recs recommendation engine.
//!
//! This crate contains the session state shape and the orchestrator that
//! coordinates batch selection with the external oracle top-up.

pub mod orchestrator;
pub mod session;

pub use orchestrator::RecommendationOrchestrator;
pub use session::SessionState;
