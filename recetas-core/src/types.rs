//! Recipe records as they move from generated text to the store and back out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title used when the generated text has no usable title line.
pub const PLACEHOLDER_TITLE: &str = "Receta Generada";

/// A recipe parsed out of generated text, before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeDraft {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }
}

/// Sequential recipe identifier, allocated once by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecipeId {
    type Err = std::num::ParseIntError;

    /// Accepts `"12"` as well as the legacy document key form `"receta12"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("receta").unwrap_or(s);
        digits.parse().map(RecipeId)
    }
}

/// Everything the store needs to persist a new recipe.
///
/// `id`, `created_at` and `likes` are deliberately absent: the store assigns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub draft: RecipeDraft,
    pub original_ingredients: Vec<String>,
}

/// A persisted recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StoredRecipe {
    pub id: RecipeId,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Ingredients exactly as the caller supplied them (after normalization).
    pub original_ingredients: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub likes: i32,
}

/// One page of the newest-first recipe listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub data: Vec<StoredRecipe>,
    pub has_more: bool,
    /// Pass back as `cursor` to fetch the following page.
    pub next_cursor: Option<String>,
}

/// Caller-supplied list that may arrive as a JSON array or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum TextList {
    Items(Vec<String>),
    Csv(String),
}

impl Default for TextList {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

impl TextList {
    /// Trimmed, non-empty entries in their original order.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Items(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Csv(csv) => csv
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<Vec<String>> for TextList {
    fn from(items: Vec<String>) -> Self {
        Self::Items(items)
    }
}

impl From<&str> for TextList {
    fn from(csv: &str) -> Self {
        Self::Csv(csv.to_string())
    }
}
