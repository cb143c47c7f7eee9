//! Comments, favorites and likes

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Comment left by a user on a recipe
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub recipe_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Recipe bookmarked by a user
#[derive(Debug, Clone, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub recipe_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Recipe liked by a user
#[derive(Debug, Clone, FromRow)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub recipe_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i64,
    pub recipe_id: i64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: i64,
    pub recipe_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewLike {
    pub user_id: i64,
    pub recipe_id: i64,
}
