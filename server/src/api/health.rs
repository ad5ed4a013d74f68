use axum::extract::State;
use axum::routing::get;
use axum::{response::IntoResponse, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use super::AppState;

pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route(HEALTH_PATH, get(health))
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        environment: state.environment.to_string(),
    })
}

#[derive(OpenApi)]
#[openapi(paths(health), components(schemas(HealthResponse)))]
pub struct ApiDoc;
