//! HTTP server module.
//!
//! This module provides:
//! - Shared application state management
//! - Route handlers over the core (store, retrieval, feedback)
//! - The axum router and serve loop

mod routes;

pub use routes::router;

use std::sync::Arc;

use crate::config::{self, Config};
use crate::error::{AppError, AppResult};
use crate::generator::SuggestionClient;
use crate::search::SearchClient;
use crate::store::{mock_tickets, seed_learnings, LearningStore, MockTicket, RepoConfig};

/// Application state shared across handlers.
///
/// Owns the learning store for the life of the process, plus the immutable
/// ticket corpus and the external-collaborator clients.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The learning store (sole owner of learning state).
    pub store: LearningStore,
    /// Suggestion generator client.
    pub generator: SuggestionClient,
    /// Codebase search client.
    pub search: SearchClient,
    /// Repositories available to codebase search.
    pub repos: Vec<RepoConfig>,
    /// Historical ticket corpus.
    pub tickets: Vec<MockTicket>,
}

impl AppState {
    /// Create application state with the seeded store and corpus
    pub fn new(config: Config) -> AppResult<Self> {
        let generator = SuggestionClient::new(&config.generator)?;
        let search = SearchClient::new(&config.search)?;
        let repos = config::load_repos(&config.repos_path);

        Ok(Self {
            config,
            store: LearningStore::with_learnings(seed_learnings()),
            generator,
            search,
            repos,
            tickets: mock_tickets(),
        })
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Bind the configured address and serve requests until shutdown.
pub async fn serve(state: SharedState) -> AppResult<()> {
    let addr = state.config.server.bind_addr.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, LogFormat, LoggingConfig, SearchConfig, ServerConfig};
    use std::path::PathBuf;

    fn create_test_config() -> Config {
        Config {
            generator: GeneratorConfig {
                api_key: "test-key".to_string(),
                base_url: "https://api.anthropic.com".to_string(),
                model: "claude-sonnet-4-5".to_string(),
                max_tokens: 2048,
                timeout_ms: 30000,
            },
            search: SearchConfig::default(),
            server: ServerConfig {
                bind_addr: "127.0.0.1:0".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
            repos_path: PathBuf::from("/nonexistent/repos.json"),
        }
    }

    #[test]
    fn test_app_state_new_seeds_store_and_corpus() {
        let state = AppState::new(create_test_config()).unwrap();

        assert_eq!(state.tickets.len(), 15);
        assert!(state.repos.is_empty());
        let stats = state.store.stats();
        assert_eq!(stats.total_count, 6);
        assert_eq!(stats.dismissed_count, 0);
    }

    #[test]
    fn test_shared_state_type() {
        let state = AppState::new(create_test_config()).unwrap();
        let shared: SharedState = Arc::new(state);

        let shared2 = Arc::clone(&shared);
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(shared2);
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
