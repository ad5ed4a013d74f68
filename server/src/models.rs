use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recetas_core::{NewRecipe, RecipeId, StoredRecipe};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub original_ingredients: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub likes: i32,
}

impl From<RecipeRow> for StoredRecipe {
    fn from(row: RecipeRow) -> Self {
        StoredRecipe {
            id: RecipeId(row.id),
            title: row.title,
            ingredients: row.ingredients,
            instructions: row.instructions,
            original_ingredients: row.original_ingredients,
            created_at: row.created_at,
            likes: row.likes,
        }
    }
}

/// Insert payload. `created_at` and `likes` come from column defaults.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeRow<'a> {
    pub id: i64,
    pub title: &'a str,
    pub ingredients: &'a [String],
    pub instructions: &'a [String],
    pub original_ingredients: &'a [String],
}

impl<'a> NewRecipeRow<'a> {
    pub fn new(id: i64, recipe: &'a NewRecipe) -> Self {
        Self {
            id,
            title: &recipe.draft.title,
            ingredients: &recipe.draft.ingredients,
            instructions: &recipe.draft.instructions,
            original_ingredients: &recipe.original_ingredients,
        }
    }
}
