//! Feedback coordinator.
//!
//! When a user accepts a suggestion, exactly one learning absorbs the
//! acceptance: an existing similar learning, the suggestion's source
//! learning, or a newly created one. The generator's bulk
//! reinforce/contradict lists are then applied best-effort.

use tracing::{debug, info};

use crate::similarity::is_similar;
use crate::store::{Learning, LearningStore, Suggestion};

/// Confidence assigned to a learning created from a freshly accepted
/// suggestion. It has exactly one acceptance behind it.
const NEW_LEARNING_CONFIDENCE: f64 = 0.5;

/// How the accepted suggestion was folded into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An existing learning with similar content was reinforced.
    ReinforcedSimilar,
    /// The suggestion's source learning was reinforced.
    ReinforcedSource,
    /// A new learning was created from the suggestion.
    Created,
}

/// Outcome of applying an acceptance.
#[derive(Debug, Clone)]
pub struct FeedbackOutcome {
    /// The learning that absorbed the acceptance.
    pub learning: Learning,
    /// Which resolution path was taken.
    pub resolution: Resolution,
}

/// Fold an accepted suggestion and the generator's bulk verdicts into the
/// store.
///
/// Resolution order, first match wins:
/// 1. an active learning whose content is similar to the accepted
///    suggestion's explanation is reinforced;
/// 2. otherwise the suggestion's `source_learning_id`, when present, is
///    reinforced;
/// 3. otherwise a new learning is created from the suggestion at
///    confidence 0.5.
///
/// The bulk lists are then applied per id in order, skipping the learning
/// just resolved so it is not reinforced twice. Unknown ids are skipped
/// silently; there is no rollback across the batch.
pub fn apply_acceptance(
    store: &LearningStore,
    accepted: &Suggestion,
    ticket_id: Option<&str>,
    reinforce_ids: &[String],
    contradict_ids: &[String],
) -> FeedbackOutcome {
    let acceptance_evidence = format!("Accepted suggestion: \"{}\"", accepted.title);

    let matching = store
        .active()
        .into_iter()
        .find(|l| is_similar(&l.content, &accepted.explanation));

    let outcome = if let Some(matching) = matching {
        let learning = store
            .reinforce(
                &matching.id,
                ticket_id.map(String::from),
                acceptance_evidence,
            )
            .unwrap_or(matching);
        info!(learning_id = %learning.id, "Acceptance reinforced similar learning");
        FeedbackOutcome {
            learning,
            resolution: Resolution::ReinforcedSimilar,
        }
    } else if let Some(reinforced) = accepted.source_learning_id.as_deref().and_then(|source_id| {
        store.reinforce(
            source_id,
            ticket_id.map(String::from),
            acceptance_evidence.as_str(),
        )
    }) {
        info!(learning_id = %reinforced.id, "Acceptance reinforced source learning");
        FeedbackOutcome {
            learning: reinforced,
            resolution: Resolution::ReinforcedSource,
        }
    } else {
        let learning = store.create(
            accepted.category,
            accepted.explanation.clone(),
            NEW_LEARNING_CONFIDENCE,
            accepted.tags.clone(),
            ticket_id.map(String::from),
        );
        info!(learning_id = %learning.id, "Acceptance created new learning");
        FeedbackOutcome {
            learning,
            resolution: Resolution::Created,
        }
    };

    for id in reinforce_ids {
        if *id == outcome.learning.id {
            continue;
        }
        if store
            .reinforce(
                id,
                ticket_id.map(String::from),
                "Confirmed by related ticket analysis",
            )
            .is_none()
        {
            debug!(learning_id = %id, "Skipping bulk reinforce for unknown learning");
        }
    }

    for id in contradict_ids {
        if store
            .contradict(
                id,
                ticket_id.map(String::from),
                "Contradicted by ticket analysis",
            )
            .is_none()
        {
            debug!(learning_id = %id, "Skipping bulk contradict for unknown learning");
        }
    }

    outcome
}
