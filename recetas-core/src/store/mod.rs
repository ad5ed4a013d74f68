//! Recipe persistence.
//!
//! A [`RecipeStore`] owns identity allocation: `insert` reserves the next
//! sequential id and writes the document as one atomic unit, so concurrent
//! callers can never observe the same counter value.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::types::{NewRecipe, RecipeId, StoredRecipe};

/// Name of the counter that hands out recipe ids.
pub const RECIPE_COUNTER: &str = "recipes";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not connect to the store: {0}")]
    Connection(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Store error: {0}")]
    Backend(String),
}

/// Document collection holding recipes plus the id counter.
#[async_trait]
pub trait RecipeStore: Send + Sync + fmt::Debug {
    /// Allocate an id, stamp `created_at`, set `likes` to 0 and persist, atomically.
    async fn insert(&self, recipe: NewRecipe) -> Result<StoredRecipe, StoreError>;

    /// Up to `limit` recipes ordered by `created_at` desc, then `id` desc.
    ///
    /// With `after`, resumes strictly after that recipe. An `after` that does not
    /// exist is ignored and the listing starts from the newest recipe.
    async fn list(
        &self,
        limit: usize,
        after: Option<RecipeId>,
    ) -> Result<Vec<StoredRecipe>, StoreError>;

    async fn get(&self, id: RecipeId) -> Result<Option<StoredRecipe>, StoreError>;

    /// Atomically add one like. `None` if the recipe does not exist.
    async fn increment_likes(&self, id: RecipeId) -> Result<Option<StoredRecipe>, StoreError>;

    /// Short name for logs (e.g., "memory", "postgres").
    fn backend_name(&self) -> &'static str;
}
