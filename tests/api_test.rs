//! HTTP API tests driving the full router with in-process requests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as req_header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use triage_kb::config::{
    Config, GeneratorConfig, LogFormat, LoggingConfig, SearchConfig, ServerConfig,
};
use triage_kb::server::{router, AppState};

fn test_config(generator_base: &str) -> Config {
    Config {
        generator: GeneratorConfig {
            api_key: "test-key".to_string(),
            base_url: generator_base.to_string(),
            model: "claude-sonnet-4-5".to_string(),
            max_tokens: 2048,
            timeout_ms: 5_000,
        },
        search: SearchConfig::default(),
        server: ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        },
        repos_path: PathBuf::from("/nonexistent/repos.json"),
    }
}

fn app(generator_base: &str) -> Router {
    let state = AppState::new(test_config(generator_base)).unwrap();
    router(Arc::new(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

mod learnings {
    use super::*;

    #[tokio::test]
    async fn listing_returns_seeded_learnings_and_stats() {
        let response = app("http://unused")
            .oneshot(get("/api/learnings"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total"], 6);
        assert_eq!(body["learnings"].as_array().unwrap().len(), 6);
        assert_eq!(body["learnings"][0]["id"], "learn-001");
        assert_eq!(body["stats"]["activeCount"], 6);
        assert_eq!(body["stats"]["dismissedCount"], 0);
    }

    #[tokio::test]
    async fn listing_applies_category_and_confidence_filters() {
        let response = app("http://unused")
            .oneshot(get("/api/learnings?category=auth&minConfidence=0.85"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["learnings"][0]["id"], "learn-001");
    }

    #[tokio::test]
    async fn listing_paginates() {
        let response = app("http://unused")
            .oneshot(get("/api/learnings?page=2&limit=4"))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["total"], 6);
        let page = body["learnings"].as_array().unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["id"], "learn-005");
    }

    #[tokio::test]
    async fn fetching_unknown_learning_is_404() {
        let response = app("http://unused")
            .oneshot(get("/api/learnings/learn-nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Learning not found: learn-nope");
    }

    #[tokio::test]
    async fn dismissal_is_idempotent_and_hides_the_learning() {
        let app = app("http://unused");

        let first = app
            .clone()
            .oneshot(post_json("/api/learnings/learn-002/dismiss", json!({})))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = body_json(first).await;
        let stamp = first["learning"]["dismissedAt"].clone();
        assert!(stamp.is_string());

        let second = app
            .clone()
            .oneshot(post_json("/api/learnings/learn-002/dismiss", json!({})))
            .await
            .unwrap();
        let second = body_json(second).await;
        assert_eq!(second["learning"]["dismissedAt"], stamp);

        let listing = body_json(app.oneshot(get("/api/learnings")).await.unwrap()).await;
        assert_eq!(listing["total"], 5);
        assert_eq!(listing["stats"]["dismissedCount"], 1);
    }
}

mod feedback {
    use super::*;

    #[tokio::test]
    async fn missing_accepted_suggestion_is_400() {
        let response = app("http://unused")
            .oneshot(post_json("/api/feedback", json!({ "resolveId": "res-1" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation error: acceptedSuggestion is required");
    }

    #[tokio::test]
    async fn novel_suggestion_creates_a_learning() {
        let response = app("http://unused")
            .oneshot(post_json(
                "/api/feedback",
                json!({
                    "acceptedSuggestion": {
                        "title": "Rotate the webhook signing secret",
                        "explanation": "Signature mismatches after a provider dashboard change mean the signing secret was rotated upstream.",
                        "confidence": 0.7,
                        "category": "config",
                        "tags": ["webhook"]
                    }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["learning"]["confidence"], 0.5);
        assert_eq!(body["learning"]["reinforcements"], 1);
        assert_eq!(body["learning"]["category"], "config");
    }

    #[tokio::test]
    async fn near_duplicate_suggestion_reinforces_the_existing_learning() {
        let app = app("http://unused");

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/feedback",
                json!({
                    "acceptedSuggestion": {
                        "title": "Invalidate stale sessions",
                        "explanation": "When login fails after a password reset, invalidate active sessions and clear Redis cache entries for that user, since stale session tokens survive password changes and must be explicitly revoked.",
                        "confidence": 0.8,
                        "category": "auth"
                    }
                }),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["learning"]["id"], "learn-001");
        assert_eq!(body["learning"]["reinforcements"], 3);

        let listing = body_json(app.oneshot(get("/api/learnings")).await.unwrap()).await;
        assert_eq!(listing["total"], 6);
    }
}

mod resolve {
    use super::*;

    fn batch_text() -> String {
        json!({
            "suggestions": [{
                "title": "Sync server clocks with NTP",
                "explanation": "Clock drift after the migration is making freshly issued tokens appear expired. Run ntpdate and enable chronyd.",
                "confidence": 0.85,
                "category": "auth",
                "tags": ["ntp", "jwt"],
                "sourceLearningId": "learn-005"
            }],
            "reinforceIds": ["learn-005"],
            "contradictIds": []
        })
        .to_string()
    }

    #[tokio::test]
    async fn empty_text_is_400() {
        let response = app("http://unused")
            .oneshot(post_json("/api/resolve", json!({ "text": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation error: Ticket text is required");
    }

    #[tokio::test]
    async fn returns_generated_suggestions_with_context_counts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(req_header("x-api-key", "test-key"))
            .and(req_header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{
                    "type": "text",
                    "text": format!("```json\n{}\n```", batch_text())
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = app(&server.uri())
            .oneshot(post_json(
                "/api/resolve",
                json!({ "text": "JWT token expired, server migration, clock drift" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["resolveId"].as_str().unwrap().starts_with("res-"));
        assert_eq!(body["suggestions"][0]["title"], "Sync server clocks with NTP");
        assert_eq!(body["suggestions"][0]["sourceLearningId"], "learn-005");
        assert_eq!(body["reinforceIds"], json!(["learn-005"]));
        assert_eq!(body["context"]["prismHits"], 0);
        assert!(body["context"]["similarTickets"].as_u64().unwrap() >= 1);
        assert!(body["context"]["relevantLearnings"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn assigns_ids_to_suggestions_the_model_left_blank() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{
                    "type": "text",
                    "text": r#"{"suggestions": [{"title": "t", "explanation": "e", "confidence": 0.6}]}"#
                }]
            })))
            .mount(&server)
            .await;

        let response = app(&server.uri())
            .oneshot(post_json("/api/resolve", json!({ "text": "smtp failure" })))
            .await
            .unwrap();

        let body = body_json(response).await;
        let id = body["suggestions"][0]["id"].as_str().unwrap();
        assert!(id.starts_with("sug-"));
    }

    #[tokio::test]
    async fn generator_failure_degrades_to_the_fallback_suggestion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let response = app(&server.uri())
            .oneshot(post_json("/api/resolve", json!({ "text": "smtp failure" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let suggestions = body["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0]["id"]
            .as_str()
            .unwrap()
            .starts_with("sug-fallback-"));
        assert_eq!(body["reinforceIds"], json!([]));
    }

    #[tokio::test]
    async fn malformed_model_output_degrades_to_the_fallback_suggestion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "I cannot answer in JSON, sorry." }]
            })))
            .mount(&server)
            .await;

        let response = app(&server.uri())
            .oneshot(post_json("/api/resolve", json!({ "text": "smtp failure" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["suggestions"][0]["id"]
            .as_str()
            .unwrap()
            .starts_with("sug-fallback-"));
    }
}

mod repos {
    use super::*;

    #[tokio::test]
    async fn missing_repos_file_yields_empty_list() {
        let response = app("http://unused").oneshot(get("/api/repos")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["repos"], json!([]));
    }
}
