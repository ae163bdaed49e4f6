use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OpenRouter API key for LLM suggestions (optional; without it the
    /// AI strategies are skipped and keyword/static fallbacks apply)
    #[serde(default)]
    pub openrouter_api_key: Option<String>,

    /// OpenRouter chat-completions base URL
    #[serde(default = "default_openrouter_api_url")]
    pub openrouter_api_url: String,

    /// Ordered list of candidate model identifiers, first working model wins
    #[serde(default = "default_suggestion_models")]
    pub suggestion_models: Vec<String>,

    /// TMDB API key (preferred catalog provider when set)
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// OMDb API key (fallback catalog provider)
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Per-request timeout for outbound provider calls, in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openrouter_api_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_suggestion_models() -> Vec<String> {
    vec![
        "openrouter/free".to_string(),
        "google/gemini-2.0-flash-exp:free".to_string(),
        "mistralai/mistral-7b-instruct:free".to_string(),
    ]
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.sanitize_keys();
        Ok(config)
    }

    /// Strips stray quotes and whitespace that tend to leak in from .env files
    fn sanitize_keys(&mut self) {
        for key in [
            &mut self.openrouter_api_key,
            &mut self.tmdb_api_key,
            &mut self.omdb_api_key,
        ] {
            if let Some(value) = key.as_mut() {
                let cleaned: String = value
                    .trim()
                    .chars()
                    .filter(|c| *c != '"' && *c != '\'')
                    .collect();
                if cleaned.is_empty() {
                    *key = None;
                } else {
                    *key = Some(cleaned);
                }
            }
        }
    }

    /// True when the TMDB key looks usable (present and not a placeholder)
    pub fn tmdb_enabled(&self) -> bool {
        self.tmdb_api_key
            .as_deref()
            .map(|k| k.len() > 20 && !k.contains("YOUR_TMDB_API_KEY"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            openrouter_api_key: None,
            openrouter_api_url: default_openrouter_api_url(),
            suggestion_models: default_suggestion_models(),
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            omdb_api_key: None,
            omdb_api_url: default_omdb_api_url(),
            provider_timeout_secs: default_provider_timeout_secs(),
            host: default_host(),
            port: default_port(),
        }
    }

    #[test]
    fn test_sanitize_strips_quotes_and_whitespace() {
        let mut config = base_config();
        config.tmdb_api_key = Some("  \"abcdef0123456789abcdef01\" ".to_string());
        config.sanitize_keys();
        assert_eq!(
            config.tmdb_api_key.as_deref(),
            Some("abcdef0123456789abcdef01")
        );
    }

    #[test]
    fn test_sanitize_empties_to_none() {
        let mut config = base_config();
        config.omdb_api_key = Some("  \"\" ".to_string());
        config.sanitize_keys();
        assert_eq!(config.omdb_api_key, None);
    }

    #[test]
    fn test_tmdb_enabled_rejects_placeholder() {
        let mut config = base_config();
        config.tmdb_api_key = Some("YOUR_TMDB_API_KEY_SHOULD_GO_HERE".to_string());
        assert!(!config.tmdb_enabled());

        config.tmdb_api_key = Some("abcdef0123456789abcdef0123456789".to_string());
        assert!(config.tmdb_enabled());
    }

    #[test]
    fn test_tmdb_enabled_rejects_short_keys() {
        let mut config = base_config();
        config.tmdb_api_key = Some("short".to_string());
        assert!(!config.tmdb_enabled());
    }
}
