//! In-process store used for tests and for running without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{RecipeStore, StoreError};
use crate::types::{NewRecipe, RecipeId, StoredRecipe};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    last_created_at: Option<DateTime<Utc>>,
    recipes: Vec<StoredRecipe>,
}

/// Recipes held in memory.
///
/// The counter and the documents sit behind one lock, so reserving an id and
/// writing the recipe happen in the same critical section.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored recipes.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.recipes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current value of the id counter.
    pub async fn last_id(&self) -> i64 {
        self.inner.lock().await.last_id
    }
}

fn sort_key(recipe: &StoredRecipe) -> (DateTime<Utc>, RecipeId) {
    (recipe.created_at, recipe.id)
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn insert(&self, recipe: NewRecipe) -> Result<StoredRecipe, StoreError> {
        let mut inner = self.inner.lock().await;

        let id = inner.last_id + 1;
        // Keep the store clock non-decreasing even if the wall clock steps back.
        let now = Utc::now();
        let created_at = match inner.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };

        let stored = StoredRecipe {
            id: RecipeId(id),
            title: recipe.draft.title,
            ingredients: recipe.draft.ingredients,
            instructions: recipe.draft.instructions,
            original_ingredients: recipe.original_ingredients,
            created_at,
            likes: 0,
        };

        inner.recipes.push(stored.clone());
        inner.last_id = id;
        inner.last_created_at = Some(created_at);

        Ok(stored)
    }

    async fn list(
        &self,
        limit: usize,
        after: Option<RecipeId>,
    ) -> Result<Vec<StoredRecipe>, StoreError> {
        let inner = self.inner.lock().await;

        let anchor = after.and_then(|id| {
            inner
                .recipes
                .iter()
                .find(|r| r.id == id)
                .map(sort_key)
        });

        let mut recipes: Vec<&StoredRecipe> = inner
            .recipes
            .iter()
            .filter(|r| anchor.is_none_or(|anchor| sort_key(r) < anchor))
            .collect();
        recipes.sort_by_key(|r| std::cmp::Reverse(sort_key(r)));

        Ok(recipes.into_iter().take(limit).cloned().collect())
    }

    async fn get(&self, id: RecipeId) -> Result<Option<StoredRecipe>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn increment_likes(&self, id: RecipeId) -> Result<Option<StoredRecipe>, StoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.recipes.iter_mut().find(|r| r.id == id).map(|r| {
            r.likes += 1;
            r.clone()
        }))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeDraft;
    use std::sync::Arc;

    fn new_recipe(title: &str) -> NewRecipe {
        NewRecipe {
            draft: RecipeDraft {
                title: title.to_string(),
                ..RecipeDraft::default()
            },
            original_ingredients: vec!["sal".to_string()],
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.insert(new_recipe("a")).await.unwrap();
        let b = store.insert(new_recipe("b")).await.unwrap();

        assert_eq!(a.id, RecipeId(1));
        assert_eq!(b.id, RecipeId(2));
        assert_eq!(a.likes, 0);
        assert!(b.created_at >= a.created_at);
        assert_eq!(store.last_id().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_never_share_an_id() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.insert(new_recipe(&i.to_string())).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id.0);
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=64).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_cursor() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c", "d"] {
            store.insert(new_recipe(title)).await.unwrap();
        }

        let first = store.list(2, None).await.unwrap();
        let titles: Vec<_> = first.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["d", "c"]);

        let second = store.list(2, Some(first[1].id)).await.unwrap();
        let titles: Vec<_> = second.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);

        assert!(store.list(2, Some(second[1].id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_cursor_starts_from_beginning() {
        let store = MemoryStore::new();
        store.insert(new_recipe("a")).await.unwrap();

        let page = store.list(10, Some(RecipeId(999))).await.unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_increment_likes() {
        let store = MemoryStore::new();
        let recipe = store.insert(new_recipe("a")).await.unwrap();

        store.increment_likes(recipe.id).await.unwrap();
        let liked = store.increment_likes(recipe.id).await.unwrap().unwrap();
        assert_eq!(liked.likes, 2);
        assert_eq!(store.get(recipe.id).await.unwrap().unwrap().likes, 2);

        assert!(store.increment_likes(RecipeId(42)).await.unwrap().is_none());
    }
}
