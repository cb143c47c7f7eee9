//! Tags, ingredients and recipe/tag links

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::{Ingredient, NewRecipeTag, RecipeTag, Tag};

/// Repository for the shared catalog and the recipe/tag join table
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Tags

    pub async fn list_tags(&self) -> DatabaseResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    pub async fn find_tag(&self, id: i64) -> DatabaseResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    pub async fn create_tag(&self, name: &str) -> DatabaseResult<Tag> {
        info!("Creating tag '{}'", name);
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(tag)
    }

    pub async fn rename_tag(&self, id: i64, name: &str) -> DatabaseResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            "UPDATE tags SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tag)
    }

    pub async fn delete_tag(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Ingredients

    pub async fn list_ingredients(&self) -> DatabaseResult<Vec<Ingredient>> {
        let ingredients =
            sqlx::query_as::<_, Ingredient>("SELECT id, name FROM ingredients ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(ingredients)
    }

    pub async fn find_ingredient(&self, id: i64) -> DatabaseResult<Option<Ingredient>> {
        let ingredient =
            sqlx::query_as::<_, Ingredient>("SELECT id, name FROM ingredients WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(ingredient)
    }

    pub async fn create_ingredient(&self, name: &str) -> DatabaseResult<Ingredient> {
        info!("Creating ingredient '{}'", name);
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "INSERT INTO ingredients (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(ingredient)
    }

    pub async fn rename_ingredient(
        &self,
        id: i64,
        name: &str,
    ) -> DatabaseResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "UPDATE ingredients SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ingredient)
    }

    pub async fn delete_ingredient(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Recipe/tag links

    pub async fn list_recipe_tags(&self) -> DatabaseResult<Vec<(RecipeTag, Tag)>> {
        let rows = sqlx::query(
            r#"
            SELECT rt.id, rt.recipe_id, rt.tag_id, t.name AS tag_name
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            ORDER BY rt.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(link_from_row).collect::<Result<_, _>>()?)
    }

    pub async fn find_recipe_tag(&self, id: i64) -> DatabaseResult<Option<(RecipeTag, Tag)>> {
        let row = sqlx::query(
            r#"
            SELECT rt.id, rt.recipe_id, rt.tag_id, t.name AS tag_name
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(link_from_row).transpose()?)
    }

    /// Link a tag to a recipe; duplicates violate `recipe_tags_recipe_id_tag_id_key`
    pub async fn create_recipe_tag(&self, link: &NewRecipeTag) -> DatabaseResult<RecipeTag> {
        let created = sqlx::query_as::<_, RecipeTag>(
            r#"
            INSERT INTO recipe_tags (recipe_id, tag_id)
            VALUES ($1, $2)
            RETURNING id, recipe_id, tag_id
            "#,
        )
        .bind(link.recipe_id)
        .bind(link.tag_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update_recipe_tag(
        &self,
        id: i64,
        recipe_id: Option<i64>,
        tag_id: Option<i64>,
    ) -> DatabaseResult<Option<RecipeTag>> {
        let updated = sqlx::query_as::<_, RecipeTag>(
            r#"
            UPDATE recipe_tags SET
                recipe_id = COALESCE($2, recipe_id),
                tag_id = COALESCE($3, tag_id)
            WHERE id = $1
            RETURNING id, recipe_id, tag_id
            "#,
        )
        .bind(id)
        .bind(recipe_id)
        .bind(tag_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete_recipe_tag(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM recipe_tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub(crate) fn link_from_row(row: &PgRow) -> Result<(RecipeTag, Tag), sqlx::Error> {
    let link = RecipeTag {
        id: row.try_get("id")?,
        recipe_id: row.try_get("recipe_id")?,
        tag_id: row.try_get("tag_id")?,
    };
    let tag = Tag {
        id: link.tag_id,
        name: row.try_get("tag_name")?,
    };
    Ok((link, tag))
}
