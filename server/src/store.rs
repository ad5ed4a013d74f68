//! PostgreSQL-backed recipe store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_types::Bool;
use recetas_core::store::RECIPE_COUNTER;
use recetas_core::{NewRecipe, RecipeId, RecipeStore, StoreError, StoredRecipe};

use crate::db::DbPool;
use crate::models::{NewRecipeRow, RecipeRow};
use crate::schema::{counters, recipes};

#[derive(Clone)]
pub struct PgRecipeStore {
    pool: DbPool,
}

impl std::fmt::Debug for PgRecipeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRecipeStore")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run blocking diesel work on a pooled connection off the async runtime.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("Database task failed: {}", e)))?
    }
}

fn backend_error(e: DieselError) -> StoreError {
    StoreError::Backend(e.to_string())
}

type RecipeFilter = Box<dyn BoxableExpression<recipes::table, Pg, SqlType = Bool>>;

/// Rows that sort after `(created_at, id)` in newest-first order.
fn older_than(created_at: DateTime<Utc>, id: i64) -> RecipeFilter {
    Box::new(
        recipes::created_at
            .lt(created_at)
            .or(recipes::created_at.eq(created_at).and(recipes::id.lt(id))),
    )
}

/// Bump the named counter, creating it at 1 on first use.
///
/// The upsert takes a row lock, so concurrent transactions serialize here
/// until the holder commits or rolls back.
fn next_id(conn: &mut PgConnection, counter: &str) -> QueryResult<i64> {
    diesel::insert_into(counters::table)
        .values((counters::name.eq(counter), counters::last_id.eq(1_i64)))
        .on_conflict(counters::name)
        .do_update()
        .set(counters::last_id.eq(counters::last_id + 1))
        .returning(counters::last_id)
        .get_result(conn)
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn insert(&self, recipe: NewRecipe) -> Result<StoredRecipe, StoreError> {
        self.with_conn(move |conn| {
            let row = conn
                .transaction::<RecipeRow, DieselError, _>(|conn| {
                    let id = next_id(conn, RECIPE_COUNTER)?;
                    diesel::insert_into(recipes::table)
                        .values(NewRecipeRow::new(id, &recipe))
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                })
                .map_err(|e| StoreError::Transaction(e.to_string()))?;
            Ok(row.into())
        })
        .await
    }

    async fn list(
        &self,
        limit: usize,
        after: Option<RecipeId>,
    ) -> Result<Vec<StoredRecipe>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.with_conn(move |conn| {
            let anchor: Option<(DateTime<Utc>, i64)> = match after {
                Some(RecipeId(after_id)) => recipes::table
                    .filter(recipes::id.eq(after_id))
                    .select((recipes::created_at, recipes::id))
                    .first(conn)
                    .optional()
                    .map_err(backend_error)?,
                None => None,
            };

            let mut query = recipes::table
                .select(RecipeRow::as_select())
                .order((recipes::created_at.desc(), recipes::id.desc()))
                .limit(limit)
                .into_boxed();

            if let Some((created_at, id)) = anchor {
                query = query.filter(older_than(created_at, id));
            }

            let rows: Vec<RecipeRow> = query.load(conn).map_err(backend_error)?;
            Ok(rows.into_iter().map(StoredRecipe::from).collect())
        })
        .await
    }

    async fn get(&self, id: RecipeId) -> Result<Option<StoredRecipe>, StoreError> {
        self.with_conn(move |conn| {
            let row: Option<RecipeRow> = recipes::table
                .filter(recipes::id.eq(id.0))
                .select(RecipeRow::as_select())
                .first(conn)
                .optional()
                .map_err(backend_error)?;
            Ok(row.map(StoredRecipe::from))
        })
        .await
    }

    async fn increment_likes(&self, id: RecipeId) -> Result<Option<StoredRecipe>, StoreError> {
        self.with_conn(move |conn| {
            let row: Option<RecipeRow> = diesel::update(recipes::table.filter(recipes::id.eq(id.0)))
                .set(recipes::likes.eq(recipes::likes + 1))
                .returning(RecipeRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(backend_error)?;
            Ok(row.map(StoredRecipe::from))
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
