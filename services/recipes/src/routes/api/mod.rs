//! REST API under `/api`

mod auth;
mod catalog;
mod comments;
mod favorites;
mod likes;
mod plans;
mod profiles;
mod recipes;
mod users;

use std::collections::HashMap;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    error::{ApiError, ApiResult, FieldErrors},
    models::{Recipe, User},
    serializers::RecipeOut,
    state::AppState,
};

/// Build the `/api` route table
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/token/", post(auth::obtain_token))
        .route(
            "/api/users/",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/users/:id/",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/profiles/",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/api/profiles/:id/",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .patch(profiles::update_profile)
                .delete(profiles::delete_profile),
        )
        .route("/api/profiles/:id/avatar/", post(profiles::upload_avatar))
        .route(
            "/api/recipes/",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/:id/",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/api/recipes/:id/comments/", post(recipes::comment_on_recipe))
        .route("/api/recipes/:id/ingredients/", post(recipes::add_ingredient))
        .route("/api/recipes/:id/images/", post(recipes::upload_image))
        .route("/api/recipes/:id/file/", put(recipes::upload_file))
        .route(
            "/api/comments/",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/comments/:id/",
            get(comments::get_comment)
                .put(comments::update_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route(
            "/api/favorites/",
            get(favorites::list_favorites).post(favorites::create_favorite),
        )
        .route(
            "/api/favorites/:id/",
            get(favorites::get_favorite)
                .put(favorites::update_favorite)
                .patch(favorites::update_favorite)
                .delete(favorites::delete_favorite),
        )
        .route(
            "/api/tags/",
            get(catalog::list_tags).post(catalog::create_tag),
        )
        .route(
            "/api/tags/:id/",
            get(catalog::get_tag)
                .put(catalog::update_tag)
                .patch(catalog::update_tag)
                .delete(catalog::delete_tag),
        )
        .route(
            "/api/ingredients/",
            get(catalog::list_ingredients).post(catalog::create_ingredient),
        )
        .route(
            "/api/ingredients/:id/",
            get(catalog::get_ingredient)
                .put(catalog::update_ingredient)
                .patch(catalog::update_ingredient)
                .delete(catalog::delete_ingredient),
        )
        .route(
            "/api/recipe-tags/",
            get(catalog::list_recipe_tags).post(catalog::create_recipe_tag),
        )
        .route(
            "/api/recipe-tags/:id/",
            get(catalog::get_recipe_tag)
                .put(catalog::update_recipe_tag)
                .patch(catalog::update_recipe_tag)
                .delete(catalog::delete_recipe_tag),
        )
        .route(
            "/api/likes/",
            get(likes::list_likes).post(likes::create_like),
        )
        .route(
            "/api/likes/:id/",
            get(likes::get_like)
                .put(likes::update_like)
                .patch(likes::update_like)
                .delete(likes::delete_like),
        )
        .merge(plans::router("/api/weight-runs"))
        .merge(plans::router("/api/weekly-plans"))
}

/// Map a missing row to 404
pub(crate) fn found<T>(value: Option<T>) -> ApiResult<T> {
    value.ok_or(ApiError::NotFound)
}

/// Map an unaffected delete to 404
pub(crate) fn deleted(removed: bool) -> ApiResult<()> {
    if removed { Ok(()) } else { Err(ApiError::NotFound) }
}

/// Message for an id that references nothing
pub(crate) fn invalid_pk(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

/// Reject ids under `field` that do not name an existing recipe
pub(crate) async fn ensure_recipes_exist(
    state: &AppState,
    field: &str,
    ids: &[i64],
) -> ApiResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let missing = state.recipe_repository.missing_ids(ids).await?;
    let mut errors = FieldErrors::new();
    for id in missing {
        errors.add(field, invalid_pk(id));
    }
    errors.into_result()
}

/// Reject a user id that does not name an existing account
pub(crate) async fn ensure_user_exists(state: &AppState, field: &str, id: i64) -> ApiResult<()> {
    match state.user_repository.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(FieldErrors::single(field, invalid_pk(id)).into()),
    }
}

/// Load the accounts referenced by `ids`
pub(crate) async fn users_by_id(
    state: &AppState,
    ids: impl IntoIterator<Item = i64>,
) -> ApiResult<HashMap<i64, User>> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(state.user_repository.find_many(&ids).await?)
}

/// Load one account that a row references
pub(crate) async fn referenced_user(state: &AppState, id: i64) -> ApiResult<User> {
    state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::internal("Dangling user reference", id))
}

/// Render recipes with their nested data
pub(crate) async fn render_recipes(
    state: &AppState,
    recipes: Vec<Recipe>,
) -> ApiResult<Vec<RecipeOut>> {
    let details = state.recipe_repository.load_details(recipes).await?;
    Ok(details.iter().map(RecipeOut::from).collect())
}

pub(crate) async fn render_recipe(state: &AppState, recipe: Recipe) -> ApiResult<RecipeOut> {
    let details = state
        .recipe_repository
        .load_detail(recipe)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(RecipeOut::from(&details))
}
