//! `/api/likes/`

use axum::{
    Json,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};

use super::{deleted, ensure_recipes_exist, ensure_user_exists, found, referenced_user, users_by_id};
use crate::{
    error::ApiResult,
    extract::ApiJson,
    middleware::{AuthUser, MaybeUser},
    permissions::authenticated_or_read_only,
    serializers::{LikeInput, LikeOut},
    state::AppState,
};

pub async fn list_likes(State(state): State<AppState>) -> ApiResult<Json<Vec<LikeOut>>> {
    let likes = state.social_repository.list_likes().await?;
    let users = users_by_id(&state, likes.iter().map(|l| l.user_id)).await?;

    Ok(Json(
        likes
            .iter()
            .filter_map(|l| users.get(&l.user_id).map(|u| LikeOut::new(l, u)))
            .collect(),
    ))
}

/// `user` defaults to the caller
pub async fn create_like(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(input): ApiJson<LikeInput>,
) -> ApiResult<impl IntoResponse> {
    let new_like = input.into_new(caller.id)?;
    if new_like.user_id != caller.id {
        ensure_user_exists(&state, "user", new_like.user_id).await?;
    }
    ensure_recipes_exist(&state, "recipe", &[new_like.recipe_id]).await?;

    let like = state.social_repository.create_like(&new_like).await?;
    let user = referenced_user(&state, like.user_id).await?;
    Ok((StatusCode::CREATED, Json(LikeOut::new(&like, &user))))
}

pub async fn get_like(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<LikeOut>> {
    let like = found(state.social_repository.find_like(id).await?)?;
    let user = referenced_user(&state, like.user_id).await?;
    Ok(Json(LikeOut::new(&like, &user)))
}

pub async fn update_like(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<LikeInput>,
) -> ApiResult<Json<LikeOut>> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    let (user_id, recipe_id) = input.into_update(method == Method::PATCH)?;
    if let Some(user_id) = user_id {
        ensure_user_exists(&state, "user", user_id).await?;
    }
    if let Some(recipe_id) = recipe_id {
        ensure_recipes_exist(&state, "recipe", &[recipe_id]).await?;
    }

    let like = found(
        state
            .social_repository
            .update_like(id, user_id, recipe_id)
            .await?,
    )?;
    let user = referenced_user(&state, like.user_id).await?;
    Ok(Json(LikeOut::new(&like, &user)))
}

pub async fn delete_like(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    deleted(state.social_repository.delete_like(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}
