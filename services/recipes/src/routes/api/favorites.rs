//! `/api/favorites/`: the collection lists the caller's own favorites; items
//! are readable by anyone and writable by their owner

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};

use super::{deleted, ensure_recipes_exist, found, referenced_user};
use crate::{
    error::{ApiError, ApiResult, FieldErrors},
    extract::ApiJson,
    middleware::{AuthUser, MaybeUser},
    models::Favorite,
    permissions::{authenticated_or_read_only, owner_or_read_only},
    serializers::{FavoriteInput, FavoriteOut, FavoriteQuery},
    state::AppState,
    validation::REQUIRED,
};

/// Fetch a favorite the caller is allowed to modify
async fn writable_favorite(
    state: &AppState,
    method: &Method,
    caller: Option<&AuthUser>,
    id: i64,
) -> ApiResult<Favorite> {
    authenticated_or_read_only(method, caller)?;
    let favorite = found(state.social_repository.find_favorite(id).await?)?;
    owner_or_read_only(method, caller, &favorite)?;
    Ok(favorite)
}

pub async fn list_favorites(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<FavoriteQuery>,
) -> ApiResult<Json<Vec<FavoriteOut>>> {
    let favorites = state
        .social_repository
        .list_favorites(caller.id, &query)
        .await?;
    let user = referenced_user(&state, caller.id).await?;

    Ok(Json(
        favorites
            .iter()
            .map(|f| FavoriteOut::new(f, &user))
            .collect(),
    ))
}

/// The owner is always the caller; a duplicate pair is a conflict
pub async fn create_favorite(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(input): ApiJson<FavoriteInput>,
) -> ApiResult<impl IntoResponse> {
    let new_favorite = input.into_new(caller.id)?;
    ensure_recipes_exist(&state, "recipe", &[new_favorite.recipe_id]).await?;

    let favorite = state.social_repository.create_favorite(&new_favorite).await?;
    let user = referenced_user(&state, favorite.user_id).await?;
    Ok((StatusCode::CREATED, Json(FavoriteOut::new(&favorite, &user))))
}

pub async fn get_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<FavoriteOut>> {
    let favorite = found(state.social_repository.find_favorite(id).await?)?;
    let user = referenced_user(&state, favorite.user_id).await?;
    Ok(Json(FavoriteOut::new(&favorite, &user)))
}

/// Only `recipe` is writable, so PUT and PATCH both require it
pub async fn update_favorite(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<FavoriteInput>,
) -> ApiResult<Json<FavoriteOut>> {
    writable_favorite(&state, &method, caller.as_ref(), id).await?;

    let recipe_id = input
        .recipe
        .ok_or_else(|| ApiError::from(FieldErrors::single("recipe", REQUIRED)))?;
    ensure_recipes_exist(&state, "recipe", &[recipe_id]).await?;

    let favorite = found(state.social_repository.update_favorite(id, recipe_id).await?)?;
    let user = referenced_user(&state, favorite.user_id).await?;
    Ok(Json(FavoriteOut::new(&favorite, &user)))
}

pub async fn delete_favorite(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    writable_favorite(&state, &method, caller.as_ref(), id).await?;

    deleted(state.social_repository.delete_favorite(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}
