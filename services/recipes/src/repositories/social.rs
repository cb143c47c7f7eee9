//! Comments, favorites and likes

use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::order_by;
use crate::{
    models::{Comment, Favorite, Like, NewComment, NewFavorite, NewLike},
    serializers::{CommentQuery, FavoriteQuery},
};

#[derive(Clone)]
pub struct SocialRepository {
    pool: PgPool,
}

impl SocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Comments

    pub async fn list_comments(&self, query: &CommentQuery) -> DatabaseResult<Vec<Comment>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT c.id, c.user_id, c.recipe_id, c.text, c.created_at \
             FROM comments c JOIN users u ON u.id = c.user_id WHERE TRUE",
        );

        if let Some(username) = &query.user_username {
            builder.push(" AND u.username = ").push_bind(username.clone());
        }

        if let Some(recipe_id) = query.recipe {
            builder.push(" AND c.recipe_id = ").push_bind(recipe_id);
        }

        builder.push(" ORDER BY ").push(order_by(
            query.ordering.as_deref(),
            &[("created_at", "c.created_at")],
            "c.id ASC",
        ));

        let comments = builder
            .build_query_as::<Comment>()
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    /// Comments on one recipe, oldest first
    pub async fn comments_for_recipe(&self, recipe_id: i64) -> DatabaseResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, recipe_id, text, created_at FROM comments \
             WHERE recipe_id = $1 ORDER BY created_at, id",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    pub async fn find_comment(&self, id: i64) -> DatabaseResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, recipe_id, text, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    pub async fn create_comment(&self, new_comment: &NewComment) -> DatabaseResult<Comment> {
        info!(
            "User {} commenting on recipe {}",
            new_comment.user_id, new_comment.recipe_id
        );

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, recipe_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, recipe_id, text, created_at
            "#,
        )
        .bind(new_comment.user_id)
        .bind(new_comment.recipe_id)
        .bind(&new_comment.text)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        id: i64,
        recipe_id: Option<i64>,
        text: Option<&str>,
    ) -> DatabaseResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET
                recipe_id = COALESCE($2, recipe_id),
                text = COALESCE($3, text)
            WHERE id = $1
            RETURNING id, user_id, recipe_id, text, created_at
            "#,
        )
        .bind(id)
        .bind(recipe_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    pub async fn delete_comment(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Favorites

    /// Favorites belonging to `user_id`, narrowed by the query filters
    pub async fn list_favorites(
        &self,
        user_id: i64,
        query: &FavoriteQuery,
    ) -> DatabaseResult<Vec<Favorite>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT f.id, f.user_id, f.recipe_id, f.created_at \
             FROM favorites f JOIN users u ON u.id = f.user_id WHERE f.user_id = ",
        );
        builder.push_bind(user_id);

        if let Some(username) = &query.user_username {
            builder.push(" AND u.username = ").push_bind(username.clone());
        }

        if let Some(recipe_id) = query.recipe {
            builder.push(" AND f.recipe_id = ").push_bind(recipe_id);
        }

        builder.push(" ORDER BY f.id ASC");

        let favorites = builder
            .build_query_as::<Favorite>()
            .fetch_all(&self.pool)
            .await?;
        Ok(favorites)
    }

    pub async fn find_favorite(&self, id: i64) -> DatabaseResult<Option<Favorite>> {
        let favorite = sqlx::query_as::<_, Favorite>(
            "SELECT id, user_id, recipe_id, created_at FROM favorites WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    /// Duplicates violate `favorites_user_id_recipe_id_key`
    pub async fn create_favorite(&self, new_favorite: &NewFavorite) -> DatabaseResult<Favorite> {
        let favorite = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, recipe_id)
            VALUES ($1, $2)
            RETURNING id, user_id, recipe_id, created_at
            "#,
        )
        .bind(new_favorite.user_id)
        .bind(new_favorite.recipe_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(favorite)
    }

    pub async fn update_favorite(
        &self,
        id: i64,
        recipe_id: i64,
    ) -> DatabaseResult<Option<Favorite>> {
        let favorite = sqlx::query_as::<_, Favorite>(
            "UPDATE favorites SET recipe_id = $2 WHERE id = $1 \
             RETURNING id, user_id, recipe_id, created_at",
        )
        .bind(id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    pub async fn delete_favorite(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Likes

    pub async fn list_likes(&self) -> DatabaseResult<Vec<Like>> {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT id, user_id, recipe_id, created_at FROM likes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(likes)
    }

    pub async fn find_like(&self, id: i64) -> DatabaseResult<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(
            "SELECT id, user_id, recipe_id, created_at FROM likes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(like)
    }

    /// Duplicates violate `likes_user_id_recipe_id_key`
    pub async fn create_like(&self, new_like: &NewLike) -> DatabaseResult<Like> {
        let like = sqlx::query_as::<_, Like>(
            r#"
            INSERT INTO likes (user_id, recipe_id)
            VALUES ($1, $2)
            RETURNING id, user_id, recipe_id, created_at
            "#,
        )
        .bind(new_like.user_id)
        .bind(new_like.recipe_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(like)
    }

    pub async fn update_like(
        &self,
        id: i64,
        user_id: Option<i64>,
        recipe_id: Option<i64>,
    ) -> DatabaseResult<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(
            r#"
            UPDATE likes SET
                user_id = COALESCE($2, user_id),
                recipe_id = COALESCE($3, recipe_id)
            WHERE id = $1
            RETURNING id, user_id, recipe_id, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(like)
    }

    pub async fn delete_like(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
