use crate::api::error::{ApiError, RECIPE_NOT_FOUND_MESSAGE};
use crate::api::{AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use recetas_core::{RecipeId, StoredRecipe};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = StoredRecipe),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let recipe = state
        .recipes
        .get_recipe(id)
        .await
        .map_err(|e| ApiError::from_recipe(e, "Error al obtener la receta", state.environment))?;

    Ok(Json(recipe))
}

/// Ids that don't parse can't name a recipe.
pub(crate) fn parse_id(raw: &str) -> Result<RecipeId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::new(StatusCode::NOT_FOUND, RECIPE_NOT_FOUND_MESSAGE))
}
