//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use screate_domain::{DomainError, Quest};
use screate_shared::{ErrorBody, ErrorCode, HealthResponse, QuestRequest, ServiceInfo};

use super::stream::generate_quest_stream;
use crate::app::App;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/health/probe", post(probe))
        .route("/api/generate-quest", post(generate_quest))
        .route("/api/generate-quest-stream", post(generate_quest_stream))
        .fallback(not_found)
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "SCreate Quest Generator".to_string(),
        version: VERSION.to_string(),
        endpoints: vec![
            "POST /api/generate-quest-stream".to_string(),
            "POST /api/generate-quest".to_string(),
            "GET /api/health".to_string(),
            "POST /api/health/probe".to_string(),
        ],
    })
}

async fn health(State(app): State<Arc<App>>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        VERSION,
        &app.model,
        app.capability.is_available(),
    ))
}

async fn probe(State(app): State<Arc<App>>) -> Json<HealthResponse> {
    let available = app.probe().await;
    Json(HealthResponse::new(VERSION, &app.model, available))
}

async fn generate_quest(
    State(app): State<Arc<App>>,
    payload: Result<Json<QuestRequest>, JsonRejection>,
) -> Result<Json<Quest>, ApiError> {
    let Json(request) = payload?;
    let brief = request.into_brief()?;
    tracing::info!(
        setting = brief.setting(),
        scene_count = brief.scene_count(),
        "Generating quest"
    );

    let quest = app.quests.pipeline.run(&brief).await;
    tracing::info!(quest_id = %quest.id, scenes = quest.scenes.len(), "Quest generated");
    Ok(Json(quest))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Validation(DomainError),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody::new(ErrorCode::NotFound, "Not found"),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new(ErrorCode::BadRequest, msg),
            ),
            ApiError::Validation(err) => {
                let body = ErrorBody::new(ErrorCode::ValidationError, err.to_string());
                let body = match err {
                    DomainError::OutOfRange {
                        field,
                        min,
                        max,
                        actual,
                    } => body.with_details(serde_json::json!({
                        "field": field,
                        "min": min,
                        "max": max,
                        "actual": actual,
                    })),
                    _ => body,
                };
                (StatusCode::BAD_REQUEST, body)
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}
