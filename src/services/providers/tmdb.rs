//! TMDB catalog provider.
//!
//! Primary provider: numeric ids, `/search/movie` for title and keyword
//! lookups, `/discover/movie` for genre discovery sorted by popularity.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, MovieRecord},
    services::providers::CatalogProvider,
};

const KEYWORD_RESULT_CAP: usize = 5;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    title: String,
    poster_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
}

impl From<TmdbMovie> for MovieRecord {
    fn from(movie: TmdbMovie) -> Self {
        MovieRecord {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            overview: movie.overview,
            release_date: movie.release_date,
            vote_average: movie.vote_average,
            ai_reason: None,
        }
    }
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    async fn fetch_search(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Vec<TmdbMovie>> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;
        Ok(search.results)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_by_title(&self, title: &str) -> AppResult<Option<MovieRecord>> {
        let results = self
            .fetch_search("/search/movie", &[("query", title)])
            .await?;

        let record = results.into_iter().next().map(MovieRecord::from);
        tracing::debug!(
            title = %title,
            matched = record.is_some(),
            provider = "tmdb",
            "Title lookup completed"
        );
        Ok(record)
    }

    async fn search_by_keyword(&self, text: &str) -> AppResult<Vec<MovieRecord>> {
        let results = self
            .fetch_search("/search/movie", &[("query", text)])
            .await?;

        let records: Vec<MovieRecord> = results
            .into_iter()
            .take(KEYWORD_RESULT_CAP)
            .map(MovieRecord::from)
            .collect();

        tracing::info!(
            query = %text,
            results = records.len(),
            provider = "tmdb",
            "Keyword search completed"
        );
        Ok(records)
    }

    async fn discover_by_genres(&self, genres: &[Genre]) -> AppResult<Vec<MovieRecord>> {
        let with_genres = genres
            .iter()
            .map(|g| g.id().to_string())
            .collect::<Vec<_>>()
            .join(",");

        let results = self
            .fetch_search(
                "/discover/movie",
                &[
                    ("with_genres", with_genres.as_str()),
                    ("sort_by", "popularity.desc"),
                ],
            )
            .await?;

        tracing::info!(
            genres = %with_genres,
            results = results.len(),
            provider = "tmdb",
            "Genre discovery completed"
        );
        Ok(results.into_iter().map(MovieRecord::from).collect())
    }

    fn supports_genre_discovery(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [{
                "id": 27205,
                "title": "Inception",
                "poster_path": "/8Z8dptZQl1qWhIdHgtiKTfIv1HQ.jpg",
                "overview": "A thief who steals corporate secrets...",
                "release_date": "2010-07-15",
                "vote_average": 8.4,
                "original_language": "en"
            }],
            "total_results": 1
        }"#;

        let response: TmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);

        let record = MovieRecord::from(response.results.into_iter().next().unwrap());
        assert_eq!(record.id, 27205);
        assert_eq!(record.title, "Inception");
        assert_eq!(record.vote_average, Some(8.4));
        assert_eq!(record.ai_reason, None);
    }

    #[test]
    fn test_search_response_tolerates_missing_results() {
        let response: TmdbSearchResponse = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_movie_with_sparse_fields() {
        let json = r#"{"id": 7, "title": "Obscure"}"#;
        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let record = MovieRecord::from(movie);
        assert_eq!(record.id, 7);
        assert_eq!(record.poster_path, None);
        assert_eq!(record.release_date, None);
    }
}
