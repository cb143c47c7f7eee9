//! Recipe repository: recipes, their images and ingredient lines

use std::collections::HashMap;

use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;

use super::{catalog::link_from_row, like_pattern, order_by, user::USER_COLUMNS};
use crate::{
    models::{
        Ingredient, NewRecipe, NewRecipeIngredient, Recipe, RecipeImage, RecipeIngredient,
        RecipeTag, Tag, UpdateRecipe, User,
    },
    serializers::RecipeQuery,
};

const RECIPE_COLUMNS: &str = "id, author_id, title, description, instructions, created_at, \
                              updated_at, cook_time, difficulty, calories, file";

/// A recipe together with everything its wire representation embeds
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub ingredients: Vec<(RecipeIngredient, Ingredient)>,
    pub images: Vec<RecipeImage>,
    pub tags: Vec<(RecipeTag, Tag)>,
}

/// Recipe repository
#[derive(Clone)]
pub struct RecipeRepository {
    pool: PgPool,
}

impl RecipeRepository {
    /// Create a new recipe repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new recipe
    pub async fn create(&self, new_recipe: &NewRecipe) -> DatabaseResult<Recipe> {
        info!(
            "Creating recipe '{}' for author {}",
            new_recipe.title, new_recipe.author_id
        );

        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes
                (author_id, title, description, instructions, created_at,
                 cook_time, difficulty, calories, file)
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6, $7, $8, $9)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(new_recipe.author_id)
        .bind(&new_recipe.title)
        .bind(&new_recipe.description)
        .bind(&new_recipe.instructions)
        .bind(new_recipe.created_at)
        .bind(new_recipe.cook_time)
        .bind(new_recipe.difficulty)
        .bind(new_recipe.calories)
        .bind(&new_recipe.file)
        .fetch_one(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Get a recipe by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Load several recipes, ordered by id
    pub async fn find_many(&self, ids: &[i64]) -> DatabaseResult<Vec<Recipe>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// IDs from `ids` that do not name an existing recipe
    pub async fn missing_ids(&self, ids: &[i64]) -> DatabaseResult<Vec<i64>> {
        let existing: Vec<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect())
    }

    /// The `limit` most recently created recipes, newest first
    pub async fn latest(&self, limit: i64) -> DatabaseResult<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// List recipes with filtering, search and ordering
    pub async fn list(&self, query: &RecipeQuery) -> DatabaseResult<Vec<Recipe>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT r.id, r.author_id, r.title, r.description, r.instructions, r.created_at, \
             r.updated_at, r.cook_time, r.difficulty, r.calories, r.file \
             FROM recipes r JOIN users u ON u.id = r.author_id WHERE TRUE",
        );

        if let Some(username) = &query.author_username {
            builder.push(" AND u.username = ").push_bind(username.clone());
        }

        if let Some(title) = &query.title {
            builder.push(" AND r.title = ").push_bind(title.clone());
        }

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search.trim());
            builder
                .push(" AND (r.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR r.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder.push(" ORDER BY ").push(order_by(
            query.ordering.as_deref(),
            &[("created_at", "r.created_at"), ("title", "r.title")],
            "r.id ASC",
        ));

        let recipes = builder
            .build_query_as::<Recipe>()
            .fetch_all(&self.pool)
            .await?;
        Ok(recipes)
    }

    /// Apply a partial update and refresh `updated_at`
    pub async fn update(&self, id: i64, update: &UpdateRecipe) -> DatabaseResult<Option<Recipe>> {
        info!("Updating recipe: {}", id);

        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            UPDATE recipes SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                instructions = COALESCE($4, instructions),
                created_at = COALESCE($5, created_at),
                cook_time = COALESCE($6, cook_time),
                difficulty = COALESCE($7, difficulty),
                calories = COALESCE($8, calories),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.instructions)
        .bind(update.created_at)
        .bind(update.cook_time)
        .bind(update.difficulty)
        .bind(update.calories)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Point the recipe at a newly stored attachment
    pub async fn set_file(&self, id: i64, path: &str) -> DatabaseResult<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "UPDATE recipes SET file = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Delete a recipe; images, ingredient lines, tags and comments cascade
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting recipe: {}", id);

        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach a stored image to a recipe
    pub async fn add_image(&self, recipe_id: i64, path: &str) -> DatabaseResult<RecipeImage> {
        let image = sqlx::query_as::<_, RecipeImage>(
            r#"
            INSERT INTO recipe_images (recipe_id, image_file)
            VALUES ($1, $2)
            RETURNING id, recipe_id, image_file
            "#,
        )
        .bind(recipe_id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    /// Add an ingredient line, creating the catalog ingredient if needed
    pub async fn add_ingredient(
        &self,
        new_line: &NewRecipeIngredient,
    ) -> DatabaseResult<(RecipeIngredient, Ingredient)> {
        let mut tx = self.pool.begin().await?;

        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(&new_line.ingredient_name)
        .fetch_one(&mut *tx)
        .await?;

        let line = sqlx::query_as::<_, RecipeIngredient>(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, recipe_id, ingredient_id, quantity, unit
            "#,
        )
        .bind(new_line.recipe_id)
        .bind(ingredient.id)
        .bind(new_line.quantity)
        .bind(new_line.unit)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((line, ingredient))
    }

    /// Load a single recipe with its embedded data
    pub async fn load_detail(&self, recipe: Recipe) -> DatabaseResult<Option<RecipeDetails>> {
        Ok(self.load_details(vec![recipe]).await?.into_iter().next())
    }

    /// Gather authors, ingredient lines, images and tags for `recipes`
    ///
    /// One query per relation, whatever the number of recipes.
    pub async fn load_details(&self, recipes: Vec<Recipe>) -> DatabaseResult<Vec<RecipeDetails>> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let author_ids: Vec<i64> = recipes.iter().map(|r| r.author_id).collect();

        let authors: HashMap<i64, User> = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(&author_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

        let mut ingredients: HashMap<i64, Vec<(RecipeIngredient, Ingredient)>> = HashMap::new();
        let rows = sqlx::query(
            r#"
            SELECT ri.id, ri.recipe_id, ri.ingredient_id, ri.quantity, ri.unit,
                   i.name AS ingredient_name
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY ri.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let line = RecipeIngredient {
                id: row.try_get("id")?,
                recipe_id: row.try_get("recipe_id")?,
                ingredient_id: row.try_get("ingredient_id")?,
                quantity: row.try_get("quantity")?,
                unit: row.try_get("unit")?,
            };
            let ingredient = Ingredient {
                id: line.ingredient_id,
                name: row.try_get("ingredient_name")?,
            };
            ingredients
                .entry(line.recipe_id)
                .or_default()
                .push((line, ingredient));
        }

        let mut images: HashMap<i64, Vec<RecipeImage>> = HashMap::new();
        let rows = sqlx::query_as::<_, RecipeImage>(
            "SELECT id, recipe_id, image_file FROM recipe_images \
             WHERE recipe_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        for image in rows {
            images.entry(image.recipe_id).or_default().push(image);
        }

        let mut tags: HashMap<i64, Vec<(RecipeTag, Tag)>> = HashMap::new();
        let rows = sqlx::query(
            r#"
            SELECT rt.id, rt.recipe_id, rt.tag_id, t.name AS tag_name
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY rt.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        for row in &rows {
            let (link, tag) = link_from_row(row)?;
            tags.entry(link.recipe_id).or_default().push((link, tag));
        }

        let details = recipes
            .into_iter()
            .filter_map(|recipe| {
                // The author may vanish between queries; drop the recipe with it.
                let author = authors.get(&recipe.author_id).cloned()?;
                Some(RecipeDetails {
                    author,
                    ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                    images: images.remove(&recipe.id).unwrap_or_default(),
                    tags: tags.remove(&recipe.id).unwrap_or_default(),
                    recipe,
                })
            })
            .collect();

        Ok(details)
    }
}
