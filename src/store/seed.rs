//! Seed data: the historical ticket corpus and the initial knowledge base.
//!
//! The ticket corpus is immutable reference data with no lifecycle beyond
//! process start. Seed learnings give the store a realistic starting state so
//! retrieval has something to rank on a fresh deployment.

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{Category, EventKind, Learning, LearningEvent, MockTicket};

fn ticket(
    id: &str,
    title: &str,
    description: &str,
    resolution: &str,
    category: Category,
    tags: &[&str],
) -> MockTicket {
    MockTicket {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        resolution: resolution.to_string(),
        category,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The historical corpus of resolved tickets.
pub fn mock_tickets() -> Vec<MockTicket> {
    vec![
        ticket(
            "ticket-001",
            "Login fails after password reset",
            "Users report they cannot log in after resetting their password. The login page shows \"invalid credentials\" even with the new password.",
            "Clear session cookies and invalidate Redis cache entries for affected users. The old session token was persisting after password reset.",
            Category::Auth,
            &["login", "session", "password", "redis", "cache"],
        ),
        ticket(
            "ticket-002",
            "502 Bad Gateway on /api/upload",
            "Upload endpoint returns 502 Bad Gateway for files larger than ~5MB. Smaller uploads work fine.",
            "Increase nginx proxy_read_timeout to 120s and proxy_send_timeout to 120s in nginx.conf.",
            Category::Config,
            &["nginx", "502", "upload", "timeout", "gateway"],
        ),
        ticket(
            "ticket-003",
            "Database connection pool exhausted",
            "Application logs show \"connection pool exhausted\" errors under load. Service becomes unresponsive after ~200 concurrent users.",
            "Increase pool size from 10 to 50 in database config. Add connection retry logic with exponential backoff.",
            Category::Performance,
            &["database", "connection", "pool", "performance", "postgresql"],
        ),
        ticket(
            "ticket-004",
            "JWT token expired immediately after login",
            "Tokens generated at login are immediately reported as expired. Issue appeared after server migration.",
            "Check server clock sync - NTP drift was causing 15-minute skew. Run ntpdate to sync and configure chronyd for automatic correction.",
            Category::Auth,
            &["jwt", "token", "ntp", "clock", "expiry"],
        ),
        ticket(
            "ticket-005",
            "Email notifications not sending",
            "Transactional emails stopped being delivered. SMTP errors in logs: \"535 Authentication Credentials Invalid\".",
            "SMTP credentials were rotated. Update EMAIL_PASSWORD env var in production secrets manager and restart the notification service.",
            Category::Config,
            &["email", "smtp", "credentials", "env", "notifications"],
        ),
        ticket(
            "ticket-006",
            "Build fails on CI but passes locally",
            "CI pipeline fails with \"Cannot find module\" errors. Same code builds fine on developer machines.",
            "Node version mismatch between local (v18) and CI (v16). Pin node version in .nvmrc and update CI pipeline to use node 18.",
            Category::Deployment,
            &["ci", "build", "node", "version", "nvmrc"],
        ),
        ticket(
            "ticket-007",
            "Memory leak in worker process",
            "Worker service memory grows continuously and requires daily restarts. RSS climbs ~50MB/hour.",
            "Event listener not removed on component unmount. Added cleanup in useEffect return function and removed duplicate event subscriptions.",
            Category::Bug,
            &["memory", "leak", "event-listener", "cleanup", "worker"],
        ),
        ticket(
            "ticket-008",
            "Deployment rollback triggered automatically",
            "New deployment failed health checks and auto-rolled back. Error: \"Application failed to start - missing required config\".",
            "Missing DATABASE_URL env var in production. Add to secret manager and ensure deployment pipeline injects it before container startup.",
            Category::Deployment,
            &["deployment", "env", "database-url", "health-check", "secrets"],
        ),
        ticket(
            "ticket-009",
            "High CPU usage on API server",
            "API server CPU pegged at 100% during business hours. Response times degraded from 50ms to 8s.",
            "Unindexed query scanning full table on every request. Added composite index on (user_id, created_at). CPU dropped to 15%.",
            Category::Performance,
            &["cpu", "performance", "database", "index", "query"],
        ),
        ticket(
            "ticket-010",
            "CORS errors in production after CDN switch",
            "Frontend getting CORS errors on API calls after migrating to new CDN. Works in staging.",
            "CDN was stripping the Origin header. Updated CDN policy to forward Origin and updated CORS allowed origins list to include new domain.",
            Category::Network,
            &["cors", "cdn", "network", "headers", "origin"],
        ),
        ticket(
            "ticket-011",
            "Password reset emails link expired",
            "Users click password reset link and see \"token expired or invalid\". Reported by users in US-East only.",
            "Reset token TTL was 1 hour but email delivery to US-East was delayed 2+ hours. Extended TTL to 24 hours and added delivery monitoring.",
            Category::Auth,
            &["password-reset", "token", "ttl", "email", "expiry"],
        ),
        ticket(
            "ticket-012",
            "Websocket connections dropping every 60 seconds",
            "Real-time features broken. Connections drop exactly at 60s. Client reconnects but users see missed events.",
            "Load balancer idle timeout set to 60s. Updated ALB idle timeout to 300s and added WebSocket ping/pong keep-alive every 30s.",
            Category::Network,
            &["websocket", "load-balancer", "timeout", "alb", "keepalive"],
        ),
        ticket(
            "ticket-013",
            "Search returning stale results",
            "Search index showing results from 3 days ago. New documents not appearing in search.",
            "Elasticsearch index refresh interval was manually set to -1 (disabled) during a performance test. Reset to default 1s refresh interval.",
            Category::Bug,
            &["search", "elasticsearch", "index", "refresh", "stale"],
        ),
        ticket(
            "ticket-014",
            "OAuth callback returns 500 error",
            "GitHub OAuth login broken. Users redirected to /auth/callback but see 500 error. Regular login works.",
            "GITHUB_CLIENT_SECRET env var not set in production. Added to secrets manager. Also updated callback URL in GitHub OAuth app settings.",
            Category::Auth,
            &["oauth", "github", "callback", "env", "secret"],
        ),
        ticket(
            "ticket-015",
            "Scheduled jobs not running in production",
            "Cron jobs that run fine locally and in staging never execute in production. No errors in logs.",
            "Production deployment uses multiple replicas - all replicas were trying to claim jobs. Added distributed lock with Redis to ensure single execution.",
            Category::Deployment,
            &["cron", "scheduler", "redis", "distributed-lock", "replicas"],
        ),
    ]
}

fn seed_learning(
    ordinal: usize,
    category: Category,
    content: &str,
    confidence: f64,
    tags: &[&str],
    source_ticket_id: &str,
) -> Learning {
    let now = Utc::now();
    let source = Some(source_ticket_id.to_string());
    Learning {
        id: format!("learn-{:03}", ordinal),
        category,
        content: content.to_string(),
        confidence,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        reinforcements: 2,
        contradictions: 0,
        source_ticket_ids: vec![source_ticket_id.to_string()],
        last_used_at: Some(now - Duration::days(ordinal as i64)),
        dismissed_at: None,
        created_at: now - Duration::days(14 + ordinal as i64),
        events: vec![
            LearningEvent {
                id: Uuid::new_v4().to_string(),
                kind: EventKind::Created,
                evidence: "Seeded from resolved incident".to_string(),
                ticket_id: source.clone(),
                created_at: now - Duration::days(14 + ordinal as i64),
            },
            LearningEvent {
                id: Uuid::new_v4().to_string(),
                kind: EventKind::Reinforced,
                evidence: "Confirmed by similar incident".to_string(),
                ticket_id: source,
                created_at: now - Duration::days(ordinal as i64),
            },
        ],
    }
}

/// The initial knowledge base distilled from the ticket corpus.
pub fn seed_learnings() -> Vec<Learning> {
    vec![
        seed_learning(
            1,
            Category::Auth,
            "When login fails after a password reset, invalidate all active sessions and clear Redis cache entries for that user. Stale session tokens survive password changes and must be explicitly revoked.",
            0.85,
            &["login", "session", "password-reset", "redis"],
            "ticket-001",
        ),
        seed_learning(
            2,
            Category::Config,
            "SMTP \"535 Authentication Credentials Invalid\" errors after a working period indicate rotated credentials. Check the email service account in secrets manager and update EMAIL_PASSWORD before restarting the notification service.",
            0.80,
            &["email", "smtp", "credentials", "env"],
            "ticket-005",
        ),
        seed_learning(
            3,
            Category::Performance,
            "Connection pool exhaustion under moderate load usually means the pool size is too small or connections are not being released. Increase pool size and add connection retry with exponential backoff.",
            0.75,
            &["database", "connection-pool", "performance"],
            "ticket-003",
        ),
        seed_learning(
            4,
            Category::Deployment,
            "CI build failures due to missing modules that work locally are almost always a Node.js version mismatch. Pin the version in .nvmrc and align CI pipeline to match.",
            0.88,
            &["ci", "node-version", "build", "nvmrc"],
            "ticket-006",
        ),
        seed_learning(
            5,
            Category::Auth,
            "JWT tokens rejected as expired immediately after issue usually mean server clock drift, especially after a server migration. Sync the clock with ntpdate and configure chronyd for continuous correction.",
            0.82,
            &["jwt", "token", "ntp", "clock"],
            "ticket-004",
        ),
        seed_learning(
            6,
            Category::Network,
            "WebSocket connections dropping at a fixed interval point to a load balancer idle timeout. Increase ALB/nginx idle timeout and add client-side ping/pong keep-alive at half the timeout interval.",
            0.78,
            &["websocket", "load-balancer", "timeout", "keepalive"],
            "ticket-012",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_shape() {
        let tickets = mock_tickets();
        assert_eq!(tickets.len(), 15);
        assert!(tickets.iter().all(|t| !t.tags.is_empty()));

        let mut ids: Vec<_> = tickets.iter().map(|t| t.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_seed_learnings_invariants() {
        let learnings = seed_learnings();
        assert_eq!(learnings.len(), 6);
        for learning in &learnings {
            assert_eq!(learning.reinforcements, 2);
            assert_eq!(learning.contradictions, 0);
            assert!(learning.is_active());
            assert_eq!(learning.events.len(), 2);
            assert_eq!(learning.events[0].kind, EventKind::Created);
            assert!(learning.confidence > 0.0 && learning.confidence < 1.0);
        }
    }

    #[test]
    fn test_seed_learnings_reference_real_tickets() {
        let ticket_ids: Vec<String> = mock_tickets().into_iter().map(|t| t.id).collect();
        for learning in seed_learnings() {
            for source in &learning.source_ticket_ids {
                assert!(ticket_ids.contains(source), "unknown ticket {source}");
            }
        }
    }
}
