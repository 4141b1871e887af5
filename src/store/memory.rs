use std::sync::RwLock;

use chrono::Utc;

use super::{Category, EventKind, Learning, LearningEvent, LearningFilters, LearningStats};

/// Confidence gained per reinforcement.
const REINFORCE_DELTA: f64 = 0.05;
/// Confidence lost per contradiction.
const CONTRADICT_DELTA: f64 = 0.05;
/// Reinforcement can never push confidence past this ceiling.
const CONFIDENCE_CEILING: f64 = 0.99;
/// Contradiction can never push confidence below zero.
const CONFIDENCE_FLOOR: f64 = 0.0;

const DEFAULT_PAGE_SIZE: usize = 50;

/// In-memory learning store.
///
/// Sole owner and mutator of the learning collection. Insertion order is
/// preserved and never re-sorted. Each mutating operation runs under one
/// write-lock region; reads return cloned snapshots.
///
/// A durable backend would implement this same operation set; none of the
/// invariants here depend on the store being in memory.
#[derive(Debug, Default)]
pub struct LearningStore {
    learnings: RwLock<Vec<Learning>>,
}

impl LearningStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given learnings
    pub fn with_learnings(learnings: Vec<Learning>) -> Self {
        Self {
            learnings: RwLock::new(learnings),
        }
    }

    /// Query learnings with optional filters and 1-indexed pagination.
    ///
    /// Returns the requested page and the total count of the filtered set
    /// before pagination. Dismissed learnings are excluded unless
    /// `show_dismissed` is set.
    pub fn query(&self, filters: &LearningFilters) -> (Vec<Learning>, usize) {
        let learnings = self.learnings.read().expect("store lock poisoned");

        let filtered: Vec<&Learning> = learnings
            .iter()
            .filter(|l| filters.category.map_or(true, |c| l.category == c))
            .filter(|l| filters.min_confidence.map_or(true, |min| l.confidence >= min))
            .filter(|l| filters.show_dismissed || l.is_active())
            .collect();

        let total = filtered.len();
        let page = filters.page.unwrap_or(1).max(1);
        let limit = filters.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let start = (page - 1).saturating_mul(limit);

        let page_items = filtered
            .into_iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect();

        (page_items, total)
    }

    /// Get a learning by id
    pub fn get(&self, id: &str) -> Option<Learning> {
        let learnings = self.learnings.read().expect("store lock poisoned");
        learnings.iter().find(|l| l.id == id).cloned()
    }

    /// Create a new learning and append it to the collection
    pub fn create(
        &self,
        category: Category,
        content: impl Into<String>,
        confidence: f64,
        tags: Vec<String>,
        source_ticket_id: Option<String>,
    ) -> Learning {
        let learning = Learning::new(category, content, confidence, tags, source_ticket_id);
        let mut learnings = self.learnings.write().expect("store lock poisoned");
        learnings.push(learning.clone());
        learning
    }

    /// Record evidence for a learning.
    ///
    /// Raises confidence by 0.05 up to the 0.99 ceiling, bumps
    /// `last_used_at`, records the ticket id (deduplicated), and appends a
    /// `reinforced` event. Repeated calls compound: the same ticket id is
    /// bookkept once, but confidence and event history grow every call.
    pub fn reinforce(
        &self,
        id: &str,
        ticket_id: Option<String>,
        evidence: impl Into<String>,
    ) -> Option<Learning> {
        let mut learnings = self.learnings.write().expect("store lock poisoned");
        let learning = learnings.iter_mut().find(|l| l.id == id)?;

        learning.reinforcements += 1;
        learning.confidence = (learning.confidence + REINFORCE_DELTA).min(CONFIDENCE_CEILING);
        learning.last_used_at = Some(Utc::now());
        record_source_ticket(learning, ticket_id.as_deref());
        learning
            .events
            .push(LearningEvent::new(EventKind::Reinforced, evidence, ticket_id));

        Some(learning.clone())
    }

    /// Record evidence against a learning.
    ///
    /// Lowers confidence by 0.05 down to 0.0, records the ticket id
    /// (deduplicated), and appends a `contradicted` event. Does not touch
    /// `last_used_at`; contradiction is not a use.
    pub fn contradict(
        &self,
        id: &str,
        ticket_id: Option<String>,
        evidence: impl Into<String>,
    ) -> Option<Learning> {
        let mut learnings = self.learnings.write().expect("store lock poisoned");
        let learning = learnings.iter_mut().find(|l| l.id == id)?;

        learning.contradictions += 1;
        learning.confidence = (learning.confidence - CONTRADICT_DELTA).max(CONFIDENCE_FLOOR);
        record_source_ticket(learning, ticket_id.as_deref());
        learning.events.push(LearningEvent::new(
            EventKind::Contradicted,
            evidence,
            ticket_id,
        ));

        Some(learning.clone())
    }

    /// Remove a learning from active retrieval.
    ///
    /// Dismissal is terminal and idempotent: the first call sets
    /// `dismissed_at` and appends the single `dismissed` event; subsequent
    /// calls return the current state unchanged.
    pub fn dismiss(&self, id: &str) -> Option<Learning> {
        let mut learnings = self.learnings.write().expect("store lock poisoned");
        let learning = learnings.iter_mut().find(|l| l.id == id)?;

        if learning.dismissed_at.is_none() {
            learning.dismissed_at = Some(Utc::now());
            learning.events.push(LearningEvent::new(
                EventKind::Dismissed,
                "Manually dismissed by operator",
                None,
            ));
        }

        Some(learning.clone())
    }

    /// Snapshot of all active learnings in insertion order
    pub fn active(&self) -> Vec<Learning> {
        let learnings = self.learnings.read().expect("store lock poisoned");
        learnings.iter().filter(|l| l.is_active()).cloned().collect()
    }

    /// Aggregate statistics over the whole collection
    pub fn stats(&self) -> LearningStats {
        let learnings = self.learnings.read().expect("store lock poisoned");

        let active_count = learnings.iter().filter(|l| l.is_active()).count();
        let dismissed_count = learnings.len() - active_count;
        let avg_confidence = if active_count > 0 {
            let sum: f64 = learnings
                .iter()
                .filter(|l| l.is_active())
                .map(|l| l.confidence)
                .sum();
            (sum / active_count as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };

        LearningStats {
            total_count: learnings.len(),
            active_count,
            avg_confidence,
            dismissed_count,
        }
    }
}

fn record_source_ticket(learning: &mut Learning, ticket_id: Option<&str>) {
    if let Some(ticket_id) = ticket_id {
        if !learning.source_ticket_ids.iter().any(|t| t == ticket_id) {
            learning.source_ticket_ids.push(ticket_id.to_string());
        }
    }
}
