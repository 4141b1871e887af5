//! # Triage KB
//!
//! A self-reinforcing knowledge base for support-ticket triage. Resolved
//! tickets become "learnings" - short, reusable fix explanations with a
//! confidence score that rises as new tickets confirm them and falls as
//! tickets contradict them.
//!
//! ## Features
//!
//! - **Learning Store**: in-memory, audit-logged store of confidence-scored
//!   learnings with reinforce/contradict/dismiss transitions
//! - **Lexical Retrieval**: deterministic keyword scoring that selects the
//!   historical tickets and learnings shown to the suggestion generator
//! - **Content Deduplication**: Jaccard word-overlap test that reinforces an
//!   existing learning instead of creating a near-duplicate
//! - **Feedback Loop**: accepted suggestions reinforce, contradict, or create
//!   learnings in a single best-effort batch
//! - **Suggestion Generator**: Anthropic Messages API client with a generic
//!   fallback suggestion on malformed model output
//! - **Codebase Search**: Prism search client that fails open to empty context
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → Retrieval → Generator (Anthropic HTTP)
//!                   ↓              ↓
//!             Learning Store ← Feedback
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use triage_kb::{AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let state = Arc::new(AppState::new(config)?);
//!     triage_kb::server::serve(state).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management for the server and its collaborators.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Feedback coordinator applying suggestion acceptance to the store.
pub mod feedback;
/// Anthropic-backed suggestion generator client.
pub mod generator;
/// System prompt for the suggestion generator.
pub mod prompts;
/// Lexical relevance ranking for tickets and learnings.
pub mod retrieval;
/// Prism codebase-search client.
pub mod search;
/// HTTP server, routes, and shared application state.
pub mod server;
/// Text similarity test used for learning deduplication.
pub mod similarity;
/// Learning store, domain types, and seed data.
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, SharedState};
