use crate::api::error::ApiError;
use crate::api::{AppState, ErrorResponse};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use recetas_core::RecipePage;
use serde::Deserialize;
use utoipa::IntoParams;

const LIST_FAILED_MESSAGE: &str = "Error al obtener recetas";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListRecipesParams {
    /// Number of items to return (default: 10, max: 50)
    pub limit: Option<i64>,
    /// `nextCursor` from the previous page
    pub cursor: Option<String>,
    /// Older name for `cursor`
    pub last_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Newest recipes first", body = RecipePage),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    params: Result<Query<ListRecipesParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected query");
        ApiError::new(StatusCode::BAD_REQUEST, "Parámetros inválidos")
    })?;

    let cursor = params.cursor.as_deref().or(params.last_id.as_deref());

    let page = state
        .recipes
        .list_recipes(params.limit, cursor)
        .await
        .map_err(|e| ApiError::from_recipe(e, LIST_FAILED_MESSAGE, state.environment))?;

    Ok(Json(page))
}
