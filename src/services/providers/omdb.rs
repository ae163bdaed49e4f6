//! OMDb catalog provider.
//!
//! Secondary provider: string imdb ids, `t=` single-title lookup and `s=`
//! search. No genre discovery. OMDb signals absence with `Response: "False"`
//! and uses the literal "N/A" as a null sentinel in most fields.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, MovieRecord},
    services::providers::{derive_movie_id, CatalogProvider},
};

const KEYWORD_RESULT_CAP: usize = 5;
const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct OmdbTitleResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: String,
}

/// "N/A" and empty strings become None
fn optional_field(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

/// OMDb ratings are text; non-numeric sentinels coerce to 0.0
fn coerce_rating(value: Option<&str>) -> f64 {
    value.and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0)
}

impl From<OmdbSearchItem> for MovieRecord {
    fn from(item: OmdbSearchItem) -> Self {
        MovieRecord {
            id: derive_movie_id(&item.imdb_id),
            title: item.title,
            poster_path: optional_field(item.poster),
            overview: None,
            release_date: optional_field(item.year),
            vote_average: None,
            ai_reason: None,
        }
    }
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    async fn fetch(&self, params: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("apikey", self.api_key.as_str()), ("type", "movie")])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for OmdbProvider {
    async fn search_by_title(&self, title: &str) -> AppResult<Option<MovieRecord>> {
        let response = self.fetch(&[("t", title)]).await?;
        let movie: OmdbTitleResponse = response.json().await?;

        if movie.response != "True" {
            tracing::debug!(title = %title, provider = "omdb", "No title match");
            return Ok(None);
        }

        let native_id = movie.imdb_id.unwrap_or_default();
        Ok(Some(MovieRecord {
            id: derive_movie_id(&native_id),
            title: movie.title.unwrap_or_else(|| title.to_string()),
            poster_path: optional_field(movie.poster),
            overview: optional_field(movie.plot),
            release_date: optional_field(movie.year),
            vote_average: Some(coerce_rating(movie.imdb_rating.as_deref())),
            ai_reason: None,
        }))
    }

    async fn search_by_keyword(&self, text: &str) -> AppResult<Vec<MovieRecord>> {
        let response = self.fetch(&[("s", text)]).await?;
        let search: OmdbSearchResponse = response.json().await?;

        if search.response != "True" {
            return Ok(Vec::new());
        }

        let records: Vec<MovieRecord> = search
            .search
            .into_iter()
            .take(KEYWORD_RESULT_CAP)
            .map(MovieRecord::from)
            .collect();

        tracing::info!(
            query = %text,
            results = records.len(),
            provider = "omdb",
            "Keyword search completed"
        );
        Ok(records)
    }

    async fn discover_by_genres(&self, _genres: &[Genre]) -> AppResult<Vec<MovieRecord>> {
        // No discovery endpoint; the resolver checks the capability flag first
        Ok(Vec::new())
    }

    fn supports_genre_discovery(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
