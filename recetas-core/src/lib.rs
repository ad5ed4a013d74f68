pub mod error;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod store;
pub mod types;

pub use error::RecipeError;
pub use llm::{create_provider, FakeProvider, GeminiProvider, GeneratorConfig, LlmError, LlmProvider};
pub use parser::parse_recipe;
pub use prompt::render_recipe_prompt;
pub use service::{RecipeService, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use store::{MemoryStore, RecipeStore, StoreError};
pub use types::{
    NewRecipe, RecipeDraft, RecipeId, RecipePage, StoredRecipe, TextList, PLACEHOLDER_TITLE,
};
