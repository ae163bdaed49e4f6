//! Movie catalog provider abstraction.
//!
//! One provider is active per process (TMDB when configured, OMDb otherwise).
//! Both normalize into the common `MovieRecord` shape; capability differences
//! (genre discovery) are surfaced through a flag rather than trait splits.

use crate::{
    error::AppResult,
    models::{Genre, MovieRecord},
};

pub mod omdb;
pub mod tmdb;

pub use omdb::OmdbProvider;
pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Best catalog match for an exact-ish title, if any
    async fn search_by_title(&self, title: &str) -> AppResult<Option<MovieRecord>>;

    /// Free-text search, capped at 5 results
    async fn search_by_keyword(&self, text: &str) -> AppResult<Vec<MovieRecord>>;

    /// Popularity-ordered discovery by genre ids; only meaningful when
    /// `supports_genre_discovery` returns true
    async fn discover_by_genres(&self, genres: &[Genre]) -> AppResult<Vec<MovieRecord>>;

    /// Whether this provider has a genre-discovery endpoint
    fn supports_genre_discovery(&self) -> bool;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Derives a stable numeric id from a provider-native identifier.
///
/// Numeric identifiers (an `imdbID` like "tt1375666" counts: the prefix is
/// constant and carries nothing) parse directly. Anything else hashes with
/// FNV-1a 64, masked to a non-negative i64 so the result survives JSON and
/// client-side comparisons. Same input, same id, every call.
pub fn derive_movie_id(native_id: &str) -> i64 {
    let digits = native_id.strip_prefix("tt").unwrap_or(native_id);
    if let Ok(id) = digits.parse::<i64>() {
        if id >= 0 {
            return id;
        }
    }

    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut hash = FNV_OFFSET;
    for byte in native_id.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    (hash & (i64::MAX as u64)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_movie_id_parses_imdb_ids() {
        assert_eq!(derive_movie_id("tt1375666"), 1375666);
        assert_eq!(derive_movie_id("27205"), 27205);
    }

    #[test]
    fn test_derive_movie_id_hashes_non_numeric() {
        let id = derive_movie_id("some-opaque-key");
        assert!(id >= 0);
        assert_ne!(id, derive_movie_id("another-key"));
    }

    #[test]
    fn test_derive_movie_id_is_deterministic() {
        for native in ["tt1375666", "weird/id#1", ""] {
            assert_eq!(derive_movie_id(native), derive_movie_id(native));
        }
    }
}
