//! Keyed lookup over a loaded catalog.

use crate::types::{Movie, MovieKey};
use std::collections::HashMap;

/// Build a key -> movie lookup for O(1) membership and attribute access.
///
/// Entries with an empty title are skipped. Later entries with a duplicate
/// key overwrite earlier ones (last wins), matching how the recommender
/// resolves watched/liked keys against the catalog.
pub fn index_by_key(movies: &[Movie]) -> HashMap<MovieKey, &Movie> {
    let mut index = HashMap::with_capacity(movies.len());
    for movie in movies {
        if movie.title.is_empty() {
            continue;
        }
        index.insert(movie.key(), movie);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, year: &str, rating: Option<f32>) -> Movie {
        Movie {
            title: title.to_string(),
            year: year.to_string(),
            genres: vec!["Drama".to_string()],
            actors: vec![],
            directors: vec![],
            imdb_url: String::new(),
            poster_url: "http://img/p.jpg".to_string(),
            imdb_rating: rating,
        }
    }

    #[test]
    fn test_index_lookup_by_normalized_key() {
        let movies = vec![movie("Inception", "2010", Some(8.8))];
        let index = index_by_key(&movies);

        assert!(index.contains_key("inception::2010"));
        assert_eq!(index["inception::2010"].title, "Inception");
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let movies = vec![movie("Heat", "1995", Some(7.0)), movie("HEAT", "1995", Some(8.3))];
        let index = index_by_key(&movies);

        assert_eq!(index.len(), 1);
        assert_eq!(index["heat::1995"].imdb_rating, Some(8.3));
    }

    #[test]
    fn test_empty_titles_skipped() {
        let movies = vec![movie("", "1995", None)];
        let index = index_by_key(&movies);
        assert!(index.is_empty());
    }
}
