pub mod get;
pub mod like;
pub mod list;

use crate::api::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes))
        .route("/{id}", get(get::get_recipe))
        .route("/{id}/like", post(like::like_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_recipes, get::get_recipe, like::like_recipe),
    components(schemas(
        recetas_core::RecipePage,
        recetas_core::StoredRecipe,
        recetas_core::RecipeId,
    ))
)]
pub struct ApiDoc;
