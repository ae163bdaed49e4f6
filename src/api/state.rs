use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::{MemoryStore, Store},
    error::AppResult,
    services::{
        providers::{CatalogProvider, OmdbProvider, TmdbProvider},
        suggestions::{OpenRouterClient, SuggestionProvider},
        HistoryRecorder, Resolver,
    },
};

/// Shared application state: the store, the active providers, the resolver
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub resolver: Arc<Resolver>,
    /// Also used directly by post creation for poster/plot enrichment
    pub catalog: Option<Arc<dyn CatalogProvider>>,
}

impl AppState {
    /// Wires providers from config. TMDB is the preferred catalog provider;
    /// OMDb fills in when only its key is present; with neither key the
    /// resolver leans on its static fallback.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.provider_timeout_secs);

        let suggestions: Option<Arc<dyn SuggestionProvider>> =
            match OpenRouterClient::from_config(config)? {
                Some(client) => Some(Arc::new(client)),
                None => {
                    tracing::warn!("No OpenRouter key configured, AI strategies disabled");
                    None
                }
            };

        let catalog: Option<Arc<dyn CatalogProvider>> = if config.tmdb_enabled() {
            let key = config.tmdb_api_key.clone().unwrap_or_default();
            Some(Arc::new(TmdbProvider::new(
                key,
                config.tmdb_api_url.clone(),
                timeout,
            )?))
        } else if let Some(key) = config.omdb_api_key.clone() {
            Some(Arc::new(OmdbProvider::new(
                key,
                config.omdb_api_url.clone(),
                timeout,
            )?))
        } else {
            tracing::warn!("No catalog provider configured, only static recommendations available");
            None
        };

        if let Some(catalog) = &catalog {
            tracing::info!(provider = catalog.name(), "Catalog provider selected");
        }

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        Ok(Self::with_parts(store, suggestions, catalog))
    }

    /// Assembles state from explicit parts; tests inject fakes through here
    pub fn with_parts(
        store: Arc<dyn Store>,
        suggestions: Option<Arc<dyn SuggestionProvider>>,
        catalog: Option<Arc<dyn CatalogProvider>>,
    ) -> Self {
        let recorder = HistoryRecorder::new(Arc::clone(&store));
        let resolver = Arc::new(Resolver::new(suggestions, catalog.clone(), recorder));
        Self {
            store,
            resolver,
            catalog,
        }
    }
}
