use thiserror::Error;

use crate::llm::LlmError;
use crate::store::StoreError;

/// Failures surfaced by [`crate::service::RecipeService`].
///
/// Parsing has no variant here: it degrades to placeholders instead of failing.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Caller input is unusable; nothing external was contacted.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Recipe generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Could not save recipe: {0}")]
    Persistence(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),
}
