//! Lexical relevance ranking.
//!
//! Two independent, pure scoring passes select the context shown to the
//! suggestion generator: the top historical tickets and the top active
//! learnings for a new ticket's text. Scoring is deliberately simple keyword
//! overlap - cheap, deterministic, auditable. The generator consuming this
//! context does the semantic reasoning.

use crate::store::{Learning, MockTicket};

/// Historical tickets returned per query.
const MAX_TICKETS: usize = 3;
/// Learnings returned per query.
const MAX_LEARNINGS: usize = 5;

/// Domain keywords checked against ticket text for tag extraction.
const TAG_KEYWORDS: &[&str] = &[
    "login", "auth", "jwt", "token", "session", "password", "oauth",
    "database", "db", "postgres", "mysql", "redis", "mongo",
    "deploy", "ci", "cd", "build", "docker", "kubernetes", "k8s",
    "nginx", "proxy", "cdn", "cors", "timeout", "gateway",
    "email", "smtp", "notification",
    "memory", "cpu", "performance", "slow", "leak",
    "websocket", "socket", "network", "dns",
    "cron", "scheduler", "job", "worker",
    "error", "exception", "crash", "500", "502", "503", "404",
    "config", "env", "secret", "credentials",
];

/// Extract domain tags from ticket text.
///
/// Case-insensitive substring containment against a fixed keyword
/// dictionary; the result preserves dictionary order and is duplicate-free.
pub fn extract_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .map(|k| k.to_string())
        .collect()
}

/// Rank the historical ticket corpus against a query.
///
/// Each query word longer than 2 characters contributes its number of
/// occurrences in the ticket's title+description+tags haystack. Tickets with
/// a zero score are dropped; ties keep corpus order. Returns at most 3.
pub fn search_tickets(query: &str, corpus: &[MockTicket]) -> Vec<MockTicket> {
    let query_lower = query.to_lowercase();
    let words: Vec<&str> = query_lower
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .collect();

    let mut scored: Vec<(usize, &MockTicket)> = corpus
        .iter()
        .map(|ticket| {
            let haystack = format!(
                "{} {} {}",
                ticket.title,
                ticket.description,
                ticket.tags.join(" ")
            )
            .to_lowercase();
            let score = words.iter().map(|w| haystack.matches(w).count()).sum();
            (score, ticket)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_TICKETS)
        .map(|(_, t)| t.clone())
        .collect()
}

/// Rank active learnings against a ticket's text and extracted tags.
///
/// Score = 2 x (learning tags found in the extracted tag set or literally in
/// the text) + (learning content words longer than 4 characters found
/// literally in the text). Zero-score learnings are dropped; ties keep input
/// order. Returns at most 5.
pub fn relevant_learnings(text: &str, tags: &[String], learnings: &[Learning]) -> Vec<Learning> {
    let text_lower = text.to_lowercase();

    let mut scored: Vec<(usize, &Learning)> = learnings
        .iter()
        .map(|learning| {
            let tag_matches = learning
                .tags
                .iter()
                .filter(|t| tags.contains(t) || text_lower.contains(t.as_str()))
                .count();
            let content_matches = learning
                .content
                .to_lowercase()
                .split_whitespace()
                .filter(|w| w.len() > 4 && text_lower.contains(w))
                .count();
            (tag_matches * 2 + content_matches, learning)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_LEARNINGS)
        .map(|(_, l)| l.clone())
        .collect()
}
