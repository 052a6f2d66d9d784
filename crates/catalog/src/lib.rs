//! # Catalog Crate
//!
//! Loads and indexes the fixed candidate movie catalog that backs
//! regular-mode recommendations.
//!
//! ## Main Components
//!
//! - **types**: Core domain types ([`Movie`], key normalization)
//! - **loader**: Parse the JSON catalog file into a filtered, ranked pool
//! - **index**: Build a key -> movie lookup for set membership checks
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{index_by_key, load_catalog};
//! use std::path::Path;
//!
//! let movies = load_catalog(Path::new("data/movie_database_top250.json"))?;
//! let index = index_by_key(&movies);
//!
//! if let Some(movie) = index.get("inception::2010") {
//!     println!("{} directed by {:?}", movie.title, movie.directors);
//! }
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod loader;
pub mod types;

// Re-export commonly used items for convenience
pub use error::{CatalogError, Result};
pub use index::index_by_key;
pub use loader::{CATALOG_LIMIT, load_catalog, parse_catalog};
pub use types::{Movie, MovieKey, is_ascii_title, movie_key, norm_title};
