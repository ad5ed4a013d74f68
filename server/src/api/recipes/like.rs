use crate::api::error::ApiError;
use crate::api::{AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use recetas_core::StoredRecipe;

use super::get::parse_id;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/like",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe with its updated like count", body = StoredRecipe),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn like_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let recipe = state
        .recipes
        .like_recipe(id)
        .await
        .map_err(|e| ApiError::from_recipe(e, "Error al registrar el me gusta", state.environment))?;

    tracing::info!(recipe_id = %recipe.id, likes = recipe.likes, "Recipe liked");
    Ok(Json(recipe))
}
