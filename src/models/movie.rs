use serde::{Deserialize, Serialize};

/// A normalized movie record returned to the client.
///
/// Whichever catalog provider produced it, the shape is the same. The `id` is
/// provider-scoped: unique within one response, not across providers or calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Rationale carried over from the LLM suggestion, when one produced this record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_reason: Option<String>,
}

impl MovieRecord {
    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.ai_reason = reason;
        self
    }
}

/// An LLM-produced movie suggestion, before catalog enrichment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub title: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// The final outcome of resolving a mood
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub mood: String,
    pub explanation: String,
    pub movies: Vec<MovieRecord>,
}
