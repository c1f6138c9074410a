//! MySQL adapter for recipe and review rows
//!
//! Owns row identity: inserts return the store-generated id. Updates and
//! deletes report whether any row matched so callers can fall through to a
//! not-found response. Listings are ordered by id ascending.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

use crate::db::schemas::{NewRecipe, NewReview, Recipe, Review};
use crate::types::{ApiError, Result};
use crate::writes::RowWriter;

/// Catalog store backed by a pooled MySQL connection.
#[derive(Clone)]
pub struct CatalogStore {
    pool: MySqlPool,
}

impl CatalogStore {
    /// Connect, bound the pool, and bring the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        info!("Connecting to MySQL catalog");

        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| ApiError::Store(format!("Failed to connect to MySQL: {e}")))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ApiError::Store(format!("Migration failed: {e}")))?;

        info!("Catalog schema is up to date");
        Ok(Self { pool })
    }

    // ------------------------------------------------------------------
    // Recipes
    // ------------------------------------------------------------------

    pub async fn recipe_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Fetch one id-ordered page of recipes.
    pub async fn recipes_page(&self, offset: i64, limit: i64) -> Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            "SELECT id, owner_id, title, description, steps \
             FROM recipes ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn recipe_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(
            "SELECT id, owner_id, title, description, steps FROM recipes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn recipes_by_owner(&self, owner_id: &str) -> Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            "SELECT id, owner_id, title, description, steps \
             FROM recipes WHERE owner_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Full-field replace. Returns false when no row matched the id.
    pub async fn update_recipe(&self, id: i64, recipe: &NewRecipe) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE recipes SET owner_id = ?, title = ?, description = ?, steps = ? \
             WHERE id = ?",
        )
        .bind(&recipe.owner_id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.steps)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Returns false when no row matched the id.
    pub async fn delete_recipe(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------

    pub async fn review_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Fetch one id-ordered page of reviews.
    pub async fn reviews_page(&self, offset: i64, limit: i64) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT id, recipe_id, owner_id, title, rating, body \
             FROM reviews ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Look up the review for a recipe reference.
    pub async fn review_by_recipe(&self, recipe_id: i64) -> Result<Option<Review>> {
        let row = sqlx::query_as::<_, Review>(
            "SELECT id, recipe_id, owner_id, title, rating, body \
             FROM reviews WHERE recipe_id = ? ORDER BY id LIMIT 1",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn reviews_by_owner(&self, owner_id: &str) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT id, recipe_id, owner_id, title, rating, body \
             FROM reviews WHERE owner_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Full-field replace. Returns false when no row matched the id.
    pub async fn update_review(&self, id: i64, review: &NewReview) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE reviews SET recipe_id = ?, owner_id = ?, title = ?, rating = ?, body = ? \
             WHERE id = ?",
        )
        .bind(review.recipe_id)
        .bind(&review.owner_id)
        .bind(&review.title)
        .bind(review.rating)
        .bind(&review.body)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Returns false when no row matched the id.
    pub async fn delete_review(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RowWriter for CatalogStore {
    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO recipes (owner_id, title, description, steps) VALUES (?, ?, ?, ?)",
        )
        .bind(&recipe.owner_id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.steps)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn insert_review(&self, review: &NewReview) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO reviews (recipe_id, owner_id, title, rating, body) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(review.recipe_id)
        .bind(&review.owner_id)
        .bind(&review.title)
        .bind(review.rating)
        .bind(&review.body)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }
}
