//! Suggestion generator backed by the Anthropic Messages API.
//!
//! The generator consumes the retrieval context (codebase search output,
//! similar tickets, relevant learnings) and returns suggestion candidates
//! plus per-learning reinforce/contradict verdicts. Malformed model output
//! degrades to a single generic low-confidence suggestion.

mod client;
mod types;

pub use client::SuggestionClient;
pub use types::{
    ContentBlock, ImageSource, Message, MessagesRequest, MessagesResponse, ResponseBlock,
    SuggestionBatch,
};
