//! LLM-backed mood suggestions via OpenRouter.
//!
//! The client walks an ordered list of candidate models; the first model that
//! answers 2xx with content we can coerce into the expected JSON shape wins.
//! Every failure along the way is logged and skipped. Total failure is an
//! empty result, never an error: the resolver reads empty as "move on".

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Genre, Suggestion},
    services::extract::extract_json_array,
};

const TEMPERATURE: f64 = 0.7;
const MAX_SUGGESTIONS: usize = 5;

/// Source of LLM movie suggestions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Up to 5 (title, rationale) pairs for the mood; empty on total failure
    async fn suggest_titles(&self, mood: &str) -> Vec<Suggestion>;

    /// Genre ids the mood maps to. `None` when no model answered at all;
    /// `Some` with an empty vec when a model answered but nothing mapped into
    /// the vocabulary (the caller may then apply its keyword fallback)
    async fn suggest_genres(&self, mood: &str) -> Option<Vec<Genre>>;
}

/// OpenRouter chat-completions client with multi-model fallback
#[derive(Clone)]
pub struct OpenRouterClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    models: Vec<String>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OpenRouterClient {
    /// Builds a client from config; `None` when no API key is configured
    pub fn from_config(config: &Config) -> AppResult<Option<Self>> {
        let Some(api_key) = config.openrouter_api_key.clone() else {
            return Ok(None);
        };

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        Ok(Some(Self {
            http_client,
            api_key,
            api_url: config.openrouter_api_url.clone(),
            models: config.suggestion_models.clone(),
        }))
    }

    fn titles_prompt(mood: &str) -> String {
        format!(
            "Act as a movie expert. The user is feeling: \"{mood}\".\n\
             Suggest {MAX_SUGGESTIONS} movies that perfectly match this emotional state or theme.\n\
             Return ONLY a raw JSON array of objects: [ {{\"title\": \"Title\", \"reason\": \"Reason\"}} ]"
        )
    }

    fn genres_prompt(mood: &str) -> String {
        let vocabulary = [
            Genre::Action,
            Genre::Adventure,
            Genre::Animation,
            Genre::Comedy,
            Genre::Crime,
            Genre::Documentary,
            Genre::Drama,
            Genre::Family,
            Genre::Fantasy,
            Genre::History,
            Genre::Horror,
            Genre::Music,
            Genre::Mystery,
            Genre::Romance,
            Genre::SciFi,
            Genre::TvMovie,
            Genre::Thriller,
            Genre::War,
            Genre::Western,
        ]
        .iter()
        .map(|g| format!("{:?}={}", g, g.id()))
        .collect::<Vec<_>>()
        .join(", ");

        format!(
            "Act as a movie expert. The user is feeling: \"{mood}\".\n\
             Map this mood to 1-3 movie genres from this vocabulary: {vocabulary}.\n\
             Return ONLY a raw JSON array of the numeric genre ids, e.g. [35, 18]"
        )
    }

    /// One chat-completion round trip against a single model
    async fn chat_completion(&self, model: &str, prompt: &str) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url);
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a helpful movie expert.",
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "http://localhost:5173")
            .header("X-Title", "MovieGuru")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenRouter returned status {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalApi("OpenRouter response had no choices".to_string()))
    }

    /// Walks the model list until one yields a parsable JSON array
    async fn first_parsed_array(&self, prompt: &str) -> Option<Value> {
        for model in &self.models {
            match self.chat_completion(model, prompt).await {
                Ok(content) => match extract_json_array(&content) {
                    Some(array) => {
                        tracing::info!(model = %model, "Suggestion model answered");
                        return Some(array);
                    }
                    None => {
                        tracing::warn!(
                            model = %model,
                            "Suggestion model returned unparsable content, trying next"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Suggestion model failed, trying next");
                }
            }
        }
        None
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for OpenRouterClient {
    async fn suggest_titles(&self, mood: &str) -> Vec<Suggestion> {
        let Some(array) = self.first_parsed_array(&Self::titles_prompt(mood)).await else {
            return Vec::new();
        };
        parse_suggestions(array)
    }

    async fn suggest_genres(&self, mood: &str) -> Option<Vec<Genre>> {
        let array = self.first_parsed_array(&Self::genres_prompt(mood)).await?;
        Some(parse_genres(array))
    }
}

/// Keeps well-formed entries, drops the rest, caps at the suggestion limit
fn parse_suggestions(array: Value) -> Vec<Suggestion> {
    let Value::Array(items) = array else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Suggestion>(item).ok())
        .filter(|s| !s.title.trim().is_empty())
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Maps numeric ids into the fixed vocabulary, dropping unknowns and duplicates
fn parse_genres(array: Value) -> Vec<Genre> {
    let Value::Array(items) = array else {
        return Vec::new();
    };
    let mut genres = Vec::new();
    for item in items {
        let Some(id) = item.as_i64() else { continue };
        let Some(genre) = i32::try_from(id).ok().and_then(Genre::from_id) else {
            continue;
        };
        if !genres.contains(&genre) {
            genres.push(genre);
        }
    }
    genres
}
