use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, warn};

use super::types::{ContentBlock, Message, MessagesRequest, MessagesResponse, SuggestionBatch};
use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::prompts::SUGGESTION_SYSTEM_PROMPT;
use crate::store::{Learning, MockTicket};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API that turns ticket text plus
/// retrieval context into suggestion candidates.
#[derive(Clone)]
pub struct SuggestionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout_ms: u64,
}

impl SuggestionClient {
    /// Create a new suggestion client
    pub fn new(config: &GeneratorConfig) -> GeneratorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GeneratorError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout_ms: config.timeout_ms,
        })
    }

    /// Generate suggestion candidates for a ticket.
    ///
    /// The prompt carries whatever context is available: codebase search
    /// output, up to 3 similar resolved tickets, up to 5 relevant learnings,
    /// and an optional screenshot. Malformed model output degrades to
    /// [`SuggestionBatch::fallback`], which is an ordinary result.
    pub async fn generate(
        &self,
        ticket_text: &str,
        search_context: &str,
        similar_tickets: &[MockTicket],
        relevant_learnings: &[Learning],
        screenshot_base64: Option<&str>,
    ) -> GeneratorResult<SuggestionBatch> {
        let prompt = build_prompt(ticket_text, search_context, similar_tickets, relevant_learnings);

        let mut content = Vec::new();
        if let Some(data) = screenshot_base64 {
            content.push(ContentBlock::png(data));
        }
        content.push(ContentBlock::text(prompt));

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: SUGGESTION_SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(content)],
        };

        let start = Instant::now();
        let response = self.execute_request(&request).await?;
        info!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "Suggestion generation succeeded"
        );

        let text = response.first_text().unwrap_or_default();
        match serde_json::from_str::<SuggestionBatch>(extract_json(text)) {
            Ok(batch) => Ok(batch.ensure_ids()),
            Err(e) => {
                warn!(error = %e, "Model output was not valid JSON, using fallback suggestion");
                Ok(SuggestionBatch::fallback())
            }
        }
    }

    async fn execute_request(&self, request: &MessagesRequest) -> GeneratorResult<MessagesResponse> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!(model = %request.model, "Calling messages API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    GeneratorError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Assemble the user prompt from the ticket and retrieval context.
fn build_prompt(
    ticket_text: &str,
    search_context: &str,
    similar_tickets: &[MockTicket],
    relevant_learnings: &[Learning],
) -> String {
    let mut parts = Vec::new();

    if !search_context.is_empty() {
        parts.push(format!("=== CODEBASE CONTEXT ===\n{}", search_context));
    }

    if !similar_tickets.is_empty() {
        let summaries = similar_tickets
            .iter()
            .map(|t| {
                format!(
                    "Ticket: {}\nDescription: {}\nResolution: {}\nCategory: {}",
                    t.title, t.description, t.resolution, t.category
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        parts.push(format!("=== SIMILAR RESOLVED TICKETS ===\n{}", summaries));
    }

    if !relevant_learnings.is_empty() {
        let summaries = relevant_learnings
            .iter()
            .map(|l| {
                let status = if l.is_active() {
                    ""
                } else {
                    "\nStatus: DISMISSED (do not suggest this)"
                };
                format!(
                    "Learning ID: {}\nCategory: {}\nContent: {}\nConfidence: {}\nTags: {}{}",
                    l.id,
                    l.category,
                    l.content,
                    l.confidence,
                    l.tags.join(", "),
                    status
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        parts.push(format!("=== EXISTING KNOWLEDGE BASE ===\n{}", summaries));
    }

    let context = if parts.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", parts.join("\n\n"))
    };

    format!(
        "=== TICKET ===\n{}{}\n\nGenerate fix suggestions as JSON:",
        ticket_text, context
    )
}

/// Extract the JSON payload from model output, tolerating markdown fences
/// and surrounding prose.
fn extract_json(text: &str) -> &str {
    if let Some(open) = text.find("```") {
        let after = &text[open + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(close) = after.find("```") {
            return after[..close].trim();
        }
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end >= start => text[start..=end].trim(),
        _ => text.trim(),
    }
}
