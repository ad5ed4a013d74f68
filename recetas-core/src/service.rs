//! Recipe gateway: prompt, generate, parse, persist, list.

use std::sync::Arc;
use std::time::Duration;

use crate::error::RecipeError;
use crate::llm::{LlmError, LlmProvider, DEFAULT_TIMEOUT_SECS};
use crate::parser::parse_recipe;
use crate::prompt::render_recipe_prompt;
use crate::store::RecipeStore;
use crate::types::{NewRecipe, RecipeId, RecipePage, StoredRecipe, TextList};

/// Page size when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a caller can get, whatever they ask for.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Generates recipes and keeps them in a store.
///
/// The provider and store are built once per process and shared by every request.
#[derive(Debug, Clone)]
pub struct RecipeService {
    provider: Arc<dyn LlmProvider>,
    store: Arc<dyn RecipeStore>,
    generation_timeout: Duration,
}

impl RecipeService {
    pub fn new(provider: Arc<dyn LlmProvider>, store: Arc<dyn RecipeStore>) -> Self {
        Self {
            provider,
            store,
            generation_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Generate a recipe from the caller's ingredients and persist it.
    ///
    /// Input is validated before the generator is contacted, and the store is
    /// only written once the generator has produced usable text.
    pub async fn create_recipe(
        &self,
        ingredients: &TextList,
        restrictions: &TextList,
        preferences: &str,
    ) -> Result<StoredRecipe, RecipeError> {
        let ingredients = ingredients.normalize();
        if ingredients.is_empty() {
            return Err(RecipeError::Validation(
                "Debes proporcionar ingredientes".to_string(),
            ));
        }
        let restrictions = restrictions.normalize();

        let prompt = render_recipe_prompt(&ingredients, &restrictions, preferences);
        let text = self.generate(&prompt).await?;

        let draft = parse_recipe(&text);
        if draft.instructions.is_empty() {
            tracing::warn!(
                provider = self.provider.provider_name(),
                title = %draft.title,
                "Generated recipe has no instructions"
            );
        }

        let stored = self
            .store
            .insert(NewRecipe {
                draft,
                original_ingredients: ingredients,
            })
            .await?;

        tracing::info!(
            recipe_id = %stored.id,
            ingredients = stored.ingredients.len(),
            instructions = stored.instructions.len(),
            store = self.store.backend_name(),
            "Recipe stored"
        );

        Ok(stored)
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        tracing::debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            "Calling generator"
        );

        let text = tokio::time::timeout(self.generation_timeout, self.provider.complete(prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.generation_timeout.as_secs()))??;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }

    /// Newest-first page of stored recipes.
    ///
    /// `limit` defaults to [`DEFAULT_PAGE_SIZE`] and is clamped to `1..=MAX_PAGE_SIZE`.
    /// A cursor that does not parse, or names no recipe, restarts from the newest.
    pub async fn list_recipes(
        &self,
        limit: Option<i64>,
        cursor: Option<&str>,
    ) -> Result<RecipePage, RecipeError> {
        let limit = clamp_page_size(limit);
        let after = cursor.and_then(|c| match c.parse::<RecipeId>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::debug!(cursor = c, "Ignoring unparseable cursor");
                None
            }
        });

        // One extra row tells us whether another page exists.
        let mut data = self.store.list(limit + 1, after).await?;
        let has_more = data.len() > limit;
        data.truncate(limit);

        let next_cursor = if has_more {
            data.last().map(|r| r.id.to_string())
        } else {
            None
        };

        Ok(RecipePage {
            data,
            has_more,
            next_cursor,
        })
    }

    pub async fn get_recipe(&self, id: RecipeId) -> Result<StoredRecipe, RecipeError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RecipeError::NotFound(format!("Recipe {}", id)))
    }

    pub async fn like_recipe(&self, id: RecipeId) -> Result<StoredRecipe, RecipeError> {
        self.store
            .increment_likes(id)
            .await?
            .ok_or_else(|| RecipeError::NotFound(format!("Recipe {}", id)))
    }
}

fn clamp_page_size(limit: Option<i64>) -> usize {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    usize::try_from(limit).unwrap_or(1)
}
