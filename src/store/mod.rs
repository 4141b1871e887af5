//! Learning store and domain types.
//!
//! This module owns the mutable collection of learnings plus the immutable
//! historical ticket corpus. The store is the sole mutator of learning state;
//! every transition appends to the learning's audit event list.

mod memory;
mod seed;

pub use memory::LearningStore;
pub use seed::{mock_tickets, seed_learnings};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fix category for learnings, tickets, and suggestions.
///
/// Closed set; unrecognized values in untrusted input deserialize to `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Authentication, sessions, tokens.
    Auth,
    /// Configuration and environment.
    Config,
    /// Latency, resource exhaustion, throughput.
    Performance,
    /// CI/CD, releases, rollbacks.
    Deployment,
    /// Connectivity, proxies, DNS.
    Network,
    /// Plain code defects.
    Bug,
    /// Anything else.
    #[default]
    #[serde(other)]
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Auth => write!(f, "auth"),
            Category::Config => write!(f, "config"),
            Category::Performance => write!(f, "performance"),
            Category::Deployment => write!(f, "deployment"),
            Category::Network => write!(f, "network"),
            Category::Bug => write!(f, "bug"),
            Category::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    /// Never fails; unknown categories fall back to `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "auth" => Category::Auth,
            "config" => Category::Config,
            "performance" => Category::Performance,
            "deployment" => Category::Deployment,
            "network" => Category::Network,
            "bug" => Category::Bug,
            _ => Category::Other,
        })
    }
}

/// Kind of audit event recorded on a learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Learning was created.
    Created,
    /// A ticket provided evidence for the learning.
    Reinforced,
    /// A ticket provided evidence against the learning.
    Contradicted,
    /// Learning was removed from active retrieval.
    Dismissed,
}

/// Immutable audit record on a learning. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningEvent {
    /// Unique event identifier.
    pub id: String,
    /// What happened.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Free-text evidence for the transition.
    pub evidence: String,
    /// Originating ticket, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    /// When the event occurred.
    pub created_at: DateTime<Utc>,
}

impl LearningEvent {
    /// Create a new event
    pub fn new(kind: EventKind, evidence: impl Into<String>, ticket_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            evidence: evidence.into(),
            ticket_id,
            created_at: Utc::now(),
        }
    }
}

/// A confidence-scored, reusable fix explanation derived from accepted
/// ticket resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Learning {
    /// Unique learning identifier.
    pub id: String,
    /// Fix category.
    pub category: Category,
    /// The reusable fix explanation.
    pub content: String,
    /// Confidence score (0.0-1.0).
    pub confidence: f64,
    /// Free-text tags.
    pub tags: Vec<String>,
    /// How many tickets confirmed this learning.
    pub reinforcements: u32,
    /// How many tickets contradicted this learning.
    pub contradictions: u32,
    /// Tickets this learning was derived from or confirmed by. Duplicate-free.
    pub source_ticket_ids: Vec<String>,
    /// When the learning last contributed to an accepted resolution.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Set once on dismissal; a dismissed learning never returns to retrieval.
    pub dismissed_at: Option<DateTime<Utc>>,
    /// When the learning was created.
    pub created_at: DateTime<Utc>,
    /// Append-only audit history. Always holds at least the creation event.
    pub events: Vec<LearningEvent>,
}

impl Learning {
    /// Create a new learning with its creation event.
    pub fn new(
        category: Category,
        content: impl Into<String>,
        confidence: f64,
        tags: Vec<String>,
        source_ticket_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let event = LearningEvent::new(
            EventKind::Created,
            "Created from accepted suggestion",
            source_ticket_id.clone(),
        );
        Self {
            id: format!("learn-{}", Uuid::new_v4().simple()),
            category,
            content: content.into(),
            confidence: confidence.clamp(0.0, 1.0),
            tags,
            reinforcements: 1,
            contradictions: 0,
            source_ticket_ids: source_ticket_id.into_iter().collect(),
            last_used_at: Some(now),
            dismissed_at: None,
            created_at: now,
            events: vec![event],
        }
    }

    /// Whether the learning is still part of active retrieval.
    pub fn is_active(&self) -> bool {
        self.dismissed_at.is_none()
    }
}

/// A candidate fix produced by the suggestion generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Unique suggestion identifier. Assigned server-side when absent.
    #[serde(default)]
    pub id: String,
    /// Concise fix title.
    pub title: String,
    /// Actionable explanation of the fix.
    pub explanation: String,
    /// Generator confidence (0.4-0.95 by convention).
    pub confidence: f64,
    /// Fix category.
    #[serde(default)]
    pub category: Category,
    /// Kebab-case tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Learning this suggestion was derived from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_learning_id: Option<String>,
}

/// A resolved historical ticket. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockTicket {
    /// Unique ticket identifier.
    pub id: String,
    /// Ticket title.
    pub title: String,
    /// Problem description.
    pub description: String,
    /// How the ticket was resolved.
    pub resolution: String,
    /// Fix category.
    pub category: Category,
    /// Free-text tags.
    pub tags: Vec<String>,
}

/// A searchable repository known to the codebase-search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// `owner/repo` slug.
    pub slug: String,
    /// Human-readable name.
    pub name: String,
}

/// Aggregate statistics over the learning collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    /// All learnings, dismissed included.
    pub total_count: usize,
    /// Learnings still in active retrieval.
    pub active_count: usize,
    /// Mean confidence of active learnings, rounded to 2 decimals.
    pub avg_confidence: f64,
    /// Dismissed learnings.
    pub dismissed_count: usize,
}

/// Filters for querying the learning collection.
#[derive(Debug, Clone, Default)]
pub struct LearningFilters {
    /// Exact category match.
    pub category: Option<Category>,
    /// Minimum confidence, inclusive.
    pub min_confidence: Option<f64>,
    /// Include dismissed learnings (default: active only).
    pub show_dismissed: bool,
    /// 1-indexed page number (default 1).
    pub page: Option<usize>,
    /// Page size (default 50).
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for (s, c) in [
            ("auth", Category::Auth),
            ("config", Category::Config),
            ("performance", Category::Performance),
            ("deployment", Category::Deployment),
            ("network", Category::Network),
            ("bug", Category::Bug),
            ("other", Category::Other),
        ] {
            assert_eq!(s.parse::<Category>().unwrap(), c);
            assert_eq!(c.to_string(), s);
        }
    }

    #[test]
    fn test_category_unknown_falls_back_to_other() {
        assert_eq!("nonsense".parse::<Category>().unwrap(), Category::Other);

        let parsed: Category = serde_json::from_str("\"nonsense\"").unwrap();
        assert_eq!(parsed, Category::Other);
    }

    #[test]
    fn test_learning_new_invariants() {
        let learning = Learning::new(
            Category::Auth,
            "Rotate the session token after password reset",
            0.5,
            vec!["session".to_string()],
            Some("ticket-001".to_string()),
        );

        assert_eq!(learning.reinforcements, 1);
        assert_eq!(learning.contradictions, 0);
        assert_eq!(learning.source_ticket_ids, vec!["ticket-001"]);
        assert!(learning.dismissed_at.is_none());
        assert!(learning.last_used_at.is_some());
        assert_eq!(learning.events.len(), 1);
        assert_eq!(learning.events[0].kind, EventKind::Created);
        assert_eq!(
            learning.events[0].ticket_id.as_deref(),
            Some("ticket-001")
        );
    }

    #[test]
    fn test_learning_new_without_source_ticket() {
        let learning = Learning::new(Category::Other, "content", 0.5, Vec::new(), None);
        assert!(learning.source_ticket_ids.is_empty());
        assert!(learning.events[0].ticket_id.is_none());
    }

    #[test]
    fn test_learning_new_clamps_confidence() {
        let learning = Learning::new(Category::Bug, "content", 1.7, Vec::new(), None);
        assert_eq!(learning.confidence, 1.0);
    }

    #[test]
    fn test_suggestion_deserializes_with_defaults() {
        let json = r#"{"id": "sug-1", "title": "Fix it", "explanation": "Do the thing", "confidence": 0.6}"#;
        let suggestion: Suggestion = serde_json::from_str(json).unwrap();
        assert_eq!(suggestion.category, Category::Other);
        assert!(suggestion.tags.is_empty());
        assert!(suggestion.source_learning_id.is_none());
    }

    #[test]
    fn test_learning_event_serializes_kind_as_type() {
        let event = LearningEvent::new(EventKind::Reinforced, "evidence", None);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "reinforced");
        assert!(json.get("ticketId").is_none());
    }
}
