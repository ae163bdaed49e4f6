//! The recommendation resolver.
//!
//! Turns a mood string into enriched movie records by running strategies in
//! priority order until one produces a non-empty list:
//!
//!   1. LLM title suggestions, each enriched via catalog title lookup
//!   2. LLM genre mapping + catalog genre discovery (capable providers only)
//!   3. Raw mood as a catalog keyword search
//!   4. A built-in static list
//!
//! Every external failure is absorbed here: a dead provider just moves
//! control to the next strategy, and strategy 4 cannot fail, so `resolve`
//! always returns a non-empty result.

use std::sync::Arc;

use crate::{
    models::{Genre, MovieRecord, RecommendationResult},
    services::{
        history::HistoryRecorder, providers::CatalogProvider, suggestions::SuggestionProvider,
    },
};

pub struct Resolver {
    suggestions: Option<Arc<dyn SuggestionProvider>>,
    catalog: Option<Arc<dyn CatalogProvider>>,
    recorder: HistoryRecorder,
}

impl Resolver {
    pub fn new(
        suggestions: Option<Arc<dyn SuggestionProvider>>,
        catalog: Option<Arc<dyn CatalogProvider>>,
        recorder: HistoryRecorder,
    ) -> Self {
        Self {
            suggestions,
            catalog,
            recorder,
        }
    }

    /// Resolve a mood into movies. Infallible by design; the requester (when
    /// known) is attached to the fire-and-forget history record.
    pub async fn resolve(&self, mood: &str, requester: Option<&str>) -> RecommendationResult {
        let (movies, explanation) = self.run_strategies(mood).await;

        let result = RecommendationResult {
            mood: mood.to_string(),
            explanation,
            movies,
        };

        self.recorder.record(mood, result.movies.len(), requester);
        result
    }

    async fn run_strategies(&self, mood: &str) -> (Vec<MovieRecord>, String) {
        let movies = self.ai_title_strategy(mood).await;
        if !movies.is_empty() {
            tracing::info!(mood = %mood, results = movies.len(), strategy = "ai_titles", "Mood resolved");
            return (movies, picks_explanation(mood));
        }

        let movies = self.ai_genre_strategy(mood).await;
        if !movies.is_empty() {
            tracing::info!(mood = %mood, results = movies.len(), strategy = "ai_genres", "Mood resolved");
            return (movies, picks_explanation(mood));
        }

        let movies = self.keyword_strategy(mood).await;
        if !movies.is_empty() {
            tracing::info!(mood = %mood, results = movies.len(), strategy = "keyword", "Mood resolved");
            return (movies, matches_explanation(mood));
        }

        tracing::warn!(mood = %mood, "All strategies exhausted, serving static fallback");
        (static_fallback(), FALLBACK_EXPLANATION.to_string())
    }

    /// Strategy 1: LLM titles, enriched one by one. Suggestions without a
    /// catalog match are dropped silently; the cap applies to suggestions
    /// requested, not to matched movies, so fewer than 5 results is normal.
    async fn ai_title_strategy(&self, mood: &str) -> Vec<MovieRecord> {
        let (Some(suggestions), Some(catalog)) = (&self.suggestions, &self.catalog) else {
            return Vec::new();
        };

        let suggested = suggestions.suggest_titles(mood).await;
        if suggested.is_empty() {
            return Vec::new();
        }

        let mut movies = Vec::new();
        for suggestion in suggested {
            match catalog.search_by_title(&suggestion.title).await {
                Ok(Some(record)) => movies.push(record.with_reason(suggestion.reason)),
                Ok(None) => {
                    tracing::debug!(title = %suggestion.title, "Suggestion had no catalog match, dropped");
                }
                Err(e) => {
                    tracing::warn!(title = %suggestion.title, error = %e, "Catalog lookup failed, suggestion dropped");
                }
            }
        }
        movies
    }

    /// Strategy 2: genre mapping + discovery. Skipped entirely when the
    /// catalog cannot discover by genre or no LLM answered; the keyword table
    /// covers the "LLM answered but nothing mapped" case.
    async fn ai_genre_strategy(&self, mood: &str) -> Vec<MovieRecord> {
        let (Some(suggestions), Some(catalog)) = (&self.suggestions, &self.catalog) else {
            return Vec::new();
        };
        if !catalog.supports_genre_discovery() {
            return Vec::new();
        }

        let genres = match suggestions.suggest_genres(mood).await {
            Some(genres) if !genres.is_empty() => genres,
            Some(_) => {
                let fallback = Genre::from_mood_keywords(mood);
                tracing::info!(mood = %mood, genres = ?fallback, "Genre mapping unusable, using keyword table");
                fallback
            }
            None => return Vec::new(),
        };

        match catalog.discover_by_genres(&genres).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(error = %e, "Genre discovery failed");
                Vec::new()
            }
        }
    }

    /// Strategy 3: the raw mood string as a search term, no LLM involved
    async fn keyword_strategy(&self, mood: &str) -> Vec<MovieRecord> {
        let Some(catalog) = &self.catalog else {
            return Vec::new();
        };
        match catalog.search_by_keyword(mood).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(error = %e, "Keyword search failed");
                Vec::new()
            }
        }
    }
}

fn picks_explanation(mood: &str) -> String {
    format!("Here are some picks for your mood: '{mood}'")
}

fn matches_explanation(mood: &str) -> String {
    format!("Movies matching your mood: '{mood}'")
}

pub const FALLBACK_EXPLANATION: &str = "We couldn't connect services, but try these favorites!";

/// Strategy 4: never fails, never empty
pub fn static_fallback() -> Vec<MovieRecord> {
    vec![
        MovieRecord {
            id: 27205,
            title: "Inception".to_string(),
            poster_path: Some("/8Z8dptZQl1qWhIdHgtiKTfIv1HQ.jpg".to_string()),
            overview: Some("Dream within a dream.".to_string()),
            release_date: Some("2010-07-15".to_string()),
            vote_average: Some(8.4),
            ai_reason: None,
        },
        MovieRecord {
            id: 157336,
            title: "Interstellar".to_string(),
            poster_path: Some("/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg".to_string()),
            overview: Some("Space travel.".to_string()),
            release_date: Some("2014-11-05".to_string()),
            vote_average: Some(8.4),
            ai_reason: None,
        },
        MovieRecord {
            id: 155,
            title: "The Dark Knight".to_string(),
            poster_path: Some("/qJ2tW6WMUDux911r6m7haRef0WH.jpg".to_string()),
            overview: Some("Batman vs Joker.".to_string()),
            release_date: Some("2008-07-14".to_string()),
            vote_average: Some(8.5),
            ai_reason: None,
        },
    ]
}
