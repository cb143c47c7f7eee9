//! Comment, favorite and like wire formats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserOut, require};
use crate::{
    error::FieldErrors,
    models::{Comment, Favorite, Like, NewComment, NewFavorite, NewLike, User},
    validation::validate_text,
};

#[derive(Debug, Clone, Serialize)]
pub struct CommentOut {
    pub id: i64,
    pub user: UserOut,
    pub recipe: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentOut {
    pub fn new(comment: &Comment, user: &User) -> Self {
        Self {
            id: comment.id,
            user: UserOut::from(user),
            recipe: comment.recipe_id,
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteOut {
    pub id: i64,
    pub user: UserOut,
    pub recipe: i64,
    pub created_at: DateTime<Utc>,
}

impl FavoriteOut {
    pub fn new(favorite: &Favorite, user: &User) -> Self {
        Self {
            id: favorite.id,
            user: UserOut::from(user),
            recipe: favorite.recipe_id,
            created_at: favorite.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeOut {
    pub id: i64,
    pub user: UserOut,
    pub recipe: i64,
    pub created_at: DateTime<Utc>,
}

impl LikeOut {
    pub fn new(like: &Like, user: &User) -> Self {
        Self {
            id: like.id,
            user: UserOut::from(user),
            recipe: like.recipe_id,
            created_at: like.created_at,
        }
    }
}

/// Comment body; the author is always the caller
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentInput {
    pub recipe: Option<i64>,
    pub text: Option<String>,
}

impl CommentInput {
    fn validate(&self, partial: bool, recipe_from_path: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !recipe_from_path {
            require(&mut errors, "recipe", &self.recipe, partial);
        }
        if let Some(text) = require(&mut errors, "text", &self.text, partial) {
            errors.check("text", validate_text(text, None));
        }
        errors
    }

    /// Build a comment by `user_id`; `recipe_id` from the URL wins over the body
    pub fn into_new(self, user_id: i64, recipe_id: Option<i64>) -> Result<NewComment, FieldErrors> {
        let errors = self.validate(false, recipe_id.is_some());

        match (recipe_id.or(self.recipe), self.text) {
            (Some(recipe_id), Some(text)) if errors.is_empty() => Ok(NewComment {
                user_id,
                recipe_id,
                text,
            }),
            _ => Err(errors),
        }
    }

    pub fn into_update(self, partial: bool) -> Result<(Option<i64>, Option<String>), FieldErrors> {
        let errors = self.validate(partial, false);
        if errors.is_empty() {
            Ok((self.recipe, self.text))
        } else {
            Err(errors)
        }
    }
}

/// Favorite body; the owner is always the caller
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FavoriteInput {
    pub recipe: Option<i64>,
}

impl FavoriteInput {
    pub fn into_new(self, user_id: i64) -> Result<NewFavorite, FieldErrors> {
        match self.recipe {
            Some(recipe_id) => Ok(NewFavorite { user_id, recipe_id }),
            None => {
                let mut errors = FieldErrors::new();
                require(&mut errors, "recipe", &self.recipe, false);
                Err(errors)
            }
        }
    }
}

/// Like body; `user` defaults to the caller
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LikeInput {
    pub user: Option<i64>,
    pub recipe: Option<i64>,
}

impl LikeInput {
    pub fn into_new(self, caller_id: i64) -> Result<NewLike, FieldErrors> {
        match self.recipe {
            Some(recipe_id) => Ok(NewLike {
                user_id: self.user.unwrap_or(caller_id),
                recipe_id,
            }),
            None => {
                let mut errors = FieldErrors::new();
                require(&mut errors, "recipe", &self.recipe, false);
                Err(errors)
            }
        }
    }

    pub fn into_update(self, partial: bool) -> Result<(Option<i64>, Option<i64>), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "user", &self.user, partial);
        require(&mut errors, "recipe", &self.recipe, partial);

        if errors.is_empty() {
            Ok((self.user, self.recipe))
        } else {
            Err(errors)
        }
    }
}
