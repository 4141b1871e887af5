use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use uuid::Uuid;

use super::SharedState;
use crate::error::{AppError, AppResult};
use crate::feedback::apply_acceptance;
use crate::generator::SuggestionBatch;
use crate::retrieval::{extract_tags, relevant_learnings, search_tickets};
use crate::store::{
    Category, Learning, LearningFilters, LearningStats, RepoConfig, Suggestion,
};

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/resolve", post(resolve))
        .route("/api/feedback", post(feedback))
        .route("/api/learnings", get(list_learnings))
        .route("/api/learnings/{id}", get(get_learning))
        .route("/api/learnings/{id}/dismiss", post(dismiss_learning))
        .route("/api/repos", get(list_repos))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => {
                error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    screenshot_base64: Option<String>,
    #[serde(default)]
    repo_slug: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveResponse {
    suggestions: Vec<Suggestion>,
    resolve_id: String,
    reinforce_ids: Vec<String>,
    contradict_ids: Vec<String>,
    context: ContextSummary,
}

/// How much retrieval context went into the generator call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContextSummary {
    prism_hits: usize,
    similar_tickets: usize,
    relevant_learnings: usize,
}

/// `POST /api/resolve` - rank context for a new ticket and generate
/// suggestion candidates.
async fn resolve(
    State(state): State<SharedState>,
    Json(body): Json<ResolveRequest>,
) -> AppResult<Json<ResolveResponse>> {
    let text = match body.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => return Err(AppError::validation("Ticket text is required")),
    };

    let tags = extract_tags(&text);

    let search_context = match body.repo_slug.as_deref() {
        Some(slug) => state.search.search(slug, &text).await,
        None => String::new(),
    };
    let similar_tickets = search_tickets(&text, &state.tickets);
    let active = state.store.active();
    let learnings = relevant_learnings(&text, &tags, &active);

    // Generation failures degrade to the generic fallback so the pipeline
    // always completes; the fallback carries no verdicts.
    let batch = match state
        .generator
        .generate(
            &text,
            &search_context,
            &similar_tickets,
            &learnings,
            body.screenshot_base64.as_deref(),
        )
        .await
    {
        Ok(batch) => batch,
        Err(e) => {
            warn!(error = %e, "Suggestion generation failed, using fallback");
            SuggestionBatch::fallback()
        }
    };

    let prism_hits = if search_context.is_empty() {
        0
    } else {
        search_context.matches("---").count()
    };

    Ok(Json(ResolveResponse {
        resolve_id: format!("res-{}", Uuid::new_v4().simple()),
        context: ContextSummary {
            prism_hits,
            similar_tickets: similar_tickets.len(),
            relevant_learnings: learnings.len(),
        },
        suggestions: batch.suggestions,
        reinforce_ids: batch.reinforce_ids,
        contradict_ids: batch.contradict_ids,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    #[serde(default)]
    resolve_id: Option<String>,
    #[serde(default)]
    accepted_suggestion: Option<Suggestion>,
    #[serde(default)]
    reinforce_ids: Vec<String>,
    #[serde(default)]
    contradict_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LearningResponse {
    learning: Learning,
}

/// `POST /api/feedback` - fold an accepted suggestion back into the store.
async fn feedback(
    State(state): State<SharedState>,
    Json(body): Json<FeedbackRequest>,
) -> AppResult<Json<LearningResponse>> {
    let accepted = body
        .accepted_suggestion
        .ok_or_else(|| AppError::validation("acceptedSuggestion is required"))?;

    let outcome = apply_acceptance(
        &state.store,
        &accepted,
        body.resolve_id.as_deref(),
        &body.reinforce_ids,
        &body.contradict_ids,
    );

    Ok(Json(LearningResponse {
        learning: outcome.learning,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LearningsQuery {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    min_confidence: Option<f64>,
    #[serde(default)]
    dismissed: bool,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct LearningsResponse {
    learnings: Vec<Learning>,
    total: usize,
    stats: LearningStats,
}

/// `GET /api/learnings` - filtered, paginated learning listing.
async fn list_learnings(
    State(state): State<SharedState>,
    Query(query): Query<LearningsQuery>,
) -> Json<LearningsResponse> {
    let filters = LearningFilters {
        category: query
            .category
            .as_deref()
            .map(|c| c.parse::<Category>().unwrap_or_default()),
        min_confidence: query.min_confidence,
        show_dismissed: query.dismissed,
        page: query.page,
        limit: query.limit,
    };

    let (learnings, total) = state.store.query(&filters);
    Json(LearningsResponse {
        learnings,
        total,
        stats: state.store.stats(),
    })
}

/// `GET /api/learnings/{id}` - single learning or 404.
async fn get_learning(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> AppResult<Json<LearningResponse>> {
    let learning = state.store.get(&id).ok_or_else(|| AppError::not_found(&id))?;
    Ok(Json(LearningResponse { learning }))
}

/// `POST /api/learnings/{id}/dismiss` - terminally dismiss a learning.
async fn dismiss_learning(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> AppResult<Json<LearningResponse>> {
    let learning = state
        .store
        .dismiss(&id)
        .ok_or_else(|| AppError::not_found(&id))?;
    Ok(Json(LearningResponse { learning }))
}

#[derive(Debug, Serialize)]
struct ReposResponse {
    repos: Vec<RepoConfig>,
}

/// `GET /api/repos` - repositories available for codebase search.
async fn list_repos(State(state): State<SharedState>) -> Json<ReposResponse> {
    Json(ReposResponse {
        repos: state.repos.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let response = AppError::validation("missing").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::not_found("learn-1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
