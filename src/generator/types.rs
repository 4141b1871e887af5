use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Category, Suggestion};

/// Request body for the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// System prompt.
    pub system: String,
    /// Conversation messages.
    pub messages: Vec<Message>,
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message role (`user` or `assistant`).
    pub role: String,
    /// Content blocks.
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message from content blocks
    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// A content block in a message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
    /// Base64-encoded image.
    Image {
        /// Image payload.
        source: ImageSource,
    },
}

impl ContentBlock {
    /// Text block from any displayable value
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// PNG image block from base64 data
    pub fn png(data: impl Into<String>) -> Self {
        ContentBlock::Image {
            source: ImageSource {
                source_type: "base64".to_string(),
                media_type: "image/png".to_string(),
                data: data.into(),
            },
        }
    }
}

/// Base64 image payload.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSource {
    /// Encoding type, always `base64`.
    #[serde(rename = "type")]
    pub source_type: String,
    /// MIME type of the image.
    pub media_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Response body from the Anthropic Messages API.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Response content blocks.
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
}

/// A content block in a model response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBlock {
    /// Block type (`text`, `tool_use`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Text payload for `text` blocks.
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// First text block in the response, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text.as_deref())
    }
}

/// The generator's structured output: suggestion candidates plus learning
/// verdicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionBatch {
    /// 1-3 candidate fixes.
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    /// Learnings this ticket provides evidence for.
    #[serde(default)]
    pub reinforce_ids: Vec<String>,
    /// Learnings this ticket provides evidence against.
    #[serde(default)]
    pub contradict_ids: Vec<String>,
}

impl SuggestionBatch {
    /// The generic batch substituted when the model's output is malformed.
    ///
    /// An ordinary result, not an error: one speculative suggestion, no
    /// verdicts.
    pub fn fallback() -> Self {
        Self {
            suggestions: vec![Suggestion {
                id: format!("sug-fallback-{}", Uuid::new_v4().simple()),
                title: "Review application logs and configuration".to_string(),
                explanation: "Unable to generate specific suggestions. Check recent application \
                              logs for error messages and verify all environment variables and \
                              configuration are correct for the affected service."
                    .to_string(),
                confidence: 0.4,
                category: Category::Other,
                tags: vec![
                    "troubleshooting".to_string(),
                    "logs".to_string(),
                    "config".to_string(),
                ],
                source_learning_id: None,
            }],
            reinforce_ids: Vec::new(),
            contradict_ids: Vec::new(),
        }
    }

    /// Assign ids to suggestions the model left blank
    pub fn ensure_ids(mut self) -> Self {
        for suggestion in &mut self.suggestions {
            if suggestion.id.is_empty() {
                suggestion.id = format!("sug-{}", Uuid::new_v4().simple());
            }
        }
        self
    }
}
