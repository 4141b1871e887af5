use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or missing configuration at startup.
    #[error("Configuration error: {message}")]
    Config {
        /// What was invalid or missing.
        message: String,
    },

    /// Missing or empty required request input.
    #[error("Validation error: {message}")]
    Validation {
        /// What the request was missing.
        message: String,
    },

    /// Id-addressed learning lookup found nothing.
    #[error("Learning not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// Suggestion generator failure.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Codebase search failure.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Anything else; surfaced as a 500.
    #[error("Internal error: {message}")]
    Internal {
        /// Underlying error message.
        message: String,
    },
}

/// Suggestion generator (Anthropic API) errors
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Non-2xx response from the Messages API.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, when readable.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Parse failure detail.
        message: String,
    },

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// The configured timeout.
        timeout_ms: u64,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Codebase search (Prism) errors.
///
/// These never cross the HTTP boundary: the search client recovers from all
/// of them by substituting an empty context string.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Slug was not of the form `owner/repo`.
    #[error("Invalid repository slug: {slug}")]
    InvalidSlug {
        /// The rejected slug.
        slug: String,
    },

    /// Non-2xx response from the search service.
    #[error("API error: {status}")]
    Api {
        /// HTTP status code.
        status: u16,
    },

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// The configured timeout.
        timeout_ms: u64,
    },

    /// Response body could not be parsed.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Parse failure detail.
        message: String,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    /// Validation error from any displayable message
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
        }
    }

    /// Not-found error for a learning id
    pub fn not_found(id: impl Into<String>) -> Self {
        AppError::NotFound { id: id.into() }
    }

    /// Internal error from any displayable message
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;
