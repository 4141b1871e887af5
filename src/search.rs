//! Prism codebase-search client.
//!
//! External collaborator with a strict fail-open policy: whatever goes wrong
//! (malformed slug, non-2xx response, timeout, parse failure), the caller
//! gets an empty context string and the resolve pipeline keeps going.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};

/// Client for the Prism codebase-search service.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
    max_results: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    max_summaries: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    relevant_code: Vec<CodeHit>,
    #[serde(default)]
    module_summaries: Vec<ModuleSummary>,
    #[serde(default)]
    findings: Vec<Finding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeHit {
    file_path: String,
    #[serde(default)]
    symbol_name: Option<String>,
    #[serde(default)]
    symbol_kind: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleSummary {
    target_id: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct Finding {
    severity: String,
    title: String,
    description: String,
    #[serde(default)]
    suggestion: Option<String>,
}

impl SearchClient {
    /// Create a new search client
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(SearchError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
            max_results: config.max_results,
        })
    }

    /// Search a repository for context relevant to the query.
    ///
    /// Fails open: any error is logged and yields an empty string.
    pub async fn search(&self, slug: &str, query: &str) -> String {
        match self.try_search(slug, query).await {
            Ok(context) => context,
            Err(e) => {
                warn!(slug = %slug, error = %e, "Codebase search failed, continuing without context");
                String::new()
            }
        }
    }

    async fn try_search(&self, slug: &str, query: &str) -> SearchResult<String> {
        // Slug is "owner/repo"; both halves become path segments.
        let (owner, repo) = slug.split_once('/').ok_or_else(|| SearchError::InvalidSlug {
            slug: slug.to_string(),
        })?;
        if owner.is_empty() || repo.is_empty() {
            return Err(SearchError::InvalidSlug {
                slug: slug.to_string(),
            });
        }

        let url = format!("{}/api/projects/{}/{}/search", self.base_url, owner, repo);
        debug!(slug = %slug, "Calling codebase search");

        let mut request = self.client.post(&url).json(&SearchRequest {
            query,
            max_results: self.max_results,
            max_summaries: self.max_results,
        });
        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                SearchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse =
            response
                .json()
                .await
                .map_err(|e| SearchError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        Ok(format_context(query, &body, self.max_results))
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn format_context(query: &str, body: &SearchResponse, max_results: usize) -> String {
    let mut lines = vec![
        format!("Prism codebase search results for: \"{}\"", query),
        String::new(),
    ];

    for hit in body.relevant_code.iter().take(max_results) {
        let name = match &hit.symbol_name {
            Some(symbol) => format!(
                "{} -> {} ({})",
                hit.file_path,
                symbol,
                hit.symbol_kind.as_deref().unwrap_or("symbol")
            ),
            None => hit.file_path.clone(),
        };
        lines.push(format!("Code: {}", name));
        if let Some(summary) = &hit.summary {
            lines.push(format!("Summary: {}", summary));
        }
        if let Some(score) = hit.score {
            lines.push(format!("Relevance: {}%", (score * 100.0).round() as i64));
        }
        lines.push("---".to_string());
    }

    for module in body.module_summaries.iter().take(3) {
        lines.push(format!("Module: {}", module.target_id));
        lines.push(format!("Summary: {}", module.content));
        lines.push("---".to_string());
    }

    let important = body
        .findings
        .iter()
        .filter(|f| f.severity == "critical" || f.severity == "high");
    for finding in important.take(3) {
        lines.push(format!("Finding [{}]: {}", finding.severity, finding.title));
        lines.push(format!("Detail: {}", finding.description));
        if let Some(suggestion) = &finding.suggestion {
            lines.push(format!("Suggestion: {}", suggestion));
        }
        lines.push("---".to_string());
    }

    // Header plus blank line only means no usable results.
    if lines.len() > 2 {
        lines.join("\n")
    } else {
        String::new()
    }
}
