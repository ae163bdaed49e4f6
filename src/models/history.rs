use serde::{Deserialize, Serialize};

/// One append-only record of a resolved mood search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub mood: String,
    pub result_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(mood: String, result_count: usize, email: Option<String>) -> Self {
        Self {
            mood,
            result_count,
            email,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
