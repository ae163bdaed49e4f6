use serde::{Deserialize, Serialize};

use crate::models::MovieRecord;

pub const DEFAULT_PROFILE_ICON: &str = "👤";

/// A stored user document, keyed by email in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    // TODO: hash passwords before this ever fronts real accounts
    pub password: String,
    #[serde(default)]
    pub favorites: Vec<MovieRecord>,
    #[serde(rename = "profileIcon", default = "default_icon")]
    pub profile_icon: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

fn default_icon() -> String {
    DEFAULT_PROFILE_ICON.to_string()
}

impl User {
    pub fn new(email: String, password: String) -> Self {
        Self {
            email,
            password,
            favorites: Vec::new(),
            profile_icon: default_icon(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
