use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{response::IntoResponse, Json, Router};
use recetas_core::{StoredRecipe, TextList};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use super::error::ApiError;
use super::{AppState, ErrorResponse};

const GENERATE_FAILED_MESSAGE: &str = "Error al generar receta";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecipeRequest {
    /// Ingredients as a list or a comma-separated string
    pub ingredients: Option<TextList>,
    /// Dietary restrictions as a list or a comma-separated string
    pub dietary_restrictions: Option<TextList>,
    pub preferences: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/generate-recipe", post(generate_recipe))
}

#[utoipa::path(
    post,
    path = "/api/generate-recipe",
    tag = "recipes",
    request_body = GenerateRecipeRequest,
    responses(
        (status = 201, description = "Recipe generated and stored", body = StoredRecipe),
        (status = 400, description = "Missing ingredients or malformed body", body = ErrorResponse),
        (status = 500, description = "Recipe could not be stored", body = ErrorResponse),
        (status = 502, description = "Generator failed", body = ErrorResponse)
    )
)]
pub async fn generate_recipe(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::from_json_rejection(rejection, state.environment))?;

    let recipe = state
        .recipes
        .create_recipe(
            &request.ingredients.unwrap_or_default(),
            &request.dietary_restrictions.unwrap_or_default(),
            request.preferences.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(|e| ApiError::from_recipe(e, GENERATE_FAILED_MESSAGE, state.environment))?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

#[derive(OpenApi)]
#[openapi(
    paths(generate_recipe),
    components(schemas(GenerateRecipeRequest, TextList, StoredRecipe))
)]
pub struct ApiDoc;
