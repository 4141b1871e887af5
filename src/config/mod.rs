use std::env;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::store::RepoConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Suggestion-generator settings.
    pub generator: GeneratorConfig,
    /// Codebase-search settings.
    pub search: SearchConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Path to the repository list file (`repos.json`).
    pub repos_path: PathBuf,
}

/// Anthropic suggestion-generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// API key sent as `x-api-key`.
    pub api_key: String,
    /// Messages API base URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens per generation.
    pub max_tokens: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Prism codebase-search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search service base URL.
    pub base_url: String,
    /// Optional bearer token; empty string disables the Authorization header.
    pub api_key: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum code results per search.
    pub max_results: usize,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, e.g. `127.0.0.1:3000`.
    pub bind_addr: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default tracing filter level when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// Structured JSON output.
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let generator = GeneratorConfig {
            api_key: env::var("ANTHROPIC_API_KEY").map_err(|_| AppError::Config {
                message: "ANTHROPIC_API_KEY is required".to_string(),
            })?,
            base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            model: env::var("GENERATOR_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5".to_string()),
            max_tokens: parsed_or("GENERATOR_MAX_TOKENS", 2048),
            timeout_ms: parsed_or("GENERATOR_TIMEOUT_MS", 30000),
        };

        let search = SearchConfig {
            base_url: env::var("PRISM_URL").unwrap_or_else(|_| "http://localhost:3100".to_string()),
            api_key: env::var("PRISM_API_KEY").unwrap_or_default(),
            timeout_ms: parsed_or("PRISM_TIMEOUT_MS", 8000),
            max_results: parsed_or("PRISM_MAX_RESULTS", 8),
        };

        let server = ServerConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let repos_path =
            PathBuf::from(env::var("REPOS_PATH").unwrap_or_else(|_| "./repos.json".to_string()));

        Ok(Config {
            generator,
            search,
            server,
            logging,
            repos_path,
        })
    }
}

fn parsed_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Load the configured repository list from a JSON file.
///
/// A missing, unreadable, or malformed file yields an empty list rather than
/// an error; the repository picker is an optional feature.
pub fn load_repos(path: &Path) -> Vec<RepoConfig> {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse repos file");
            Vec::new()
        }),
        Err(_) => Vec::new(),
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3100".to_string(),
            api_key: String::new(),
            timeout_ms: 8000,
            max_results: 8,
        }
    }
}
