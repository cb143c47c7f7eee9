//! `/api/comments/`

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};

use super::{deleted, ensure_recipes_exist, found, referenced_user, users_by_id};
use crate::{
    error::ApiResult,
    extract::ApiJson,
    middleware::{AuthUser, MaybeUser},
    models::Comment,
    permissions::{authenticated_or_read_only, owner_or_read_only},
    serializers::{CommentInput, CommentOut, CommentQuery},
    state::AppState,
};

async fn render(state: &AppState, comment: &Comment) -> ApiResult<CommentOut> {
    let user = referenced_user(state, comment.user_id).await?;
    Ok(CommentOut::new(comment, &user))
}

async fn writable_comment(
    state: &AppState,
    method: &Method,
    caller: Option<&AuthUser>,
    id: i64,
) -> ApiResult<Comment> {
    authenticated_or_read_only(method, caller)?;
    let comment = found(state.social_repository.find_comment(id).await?)?;
    owner_or_read_only(method, caller, &comment)?;
    Ok(comment)
}

pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> ApiResult<Json<Vec<CommentOut>>> {
    let comments = state.social_repository.list_comments(&query).await?;
    let users = users_by_id(&state, comments.iter().map(|c| c.user_id)).await?;

    Ok(Json(
        comments
            .iter()
            .filter_map(|c| users.get(&c.user_id).map(|u| CommentOut::new(c, u)))
            .collect(),
    ))
}

/// The author is always the caller
pub async fn create_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(input): ApiJson<CommentInput>,
) -> ApiResult<impl IntoResponse> {
    let new_comment = input.into_new(caller.id, None)?;
    ensure_recipes_exist(&state, "recipe", &[new_comment.recipe_id]).await?;

    let comment = state.social_repository.create_comment(&new_comment).await?;
    Ok((StatusCode::CREATED, Json(render(&state, &comment).await?)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CommentOut>> {
    let comment = found(state.social_repository.find_comment(id).await?)?;
    Ok(Json(render(&state, &comment).await?))
}

pub async fn update_comment(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<CommentInput>,
) -> ApiResult<Json<CommentOut>> {
    writable_comment(&state, &method, caller.as_ref(), id).await?;

    let (recipe_id, text) = input.into_update(method == Method::PATCH)?;
    if let Some(recipe_id) = recipe_id {
        ensure_recipes_exist(&state, "recipe", &[recipe_id]).await?;
    }

    let comment = found(
        state
            .social_repository
            .update_comment(id, recipe_id, text.as_deref())
            .await?,
    )?;
    Ok(Json(render(&state, &comment).await?))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    writable_comment(&state, &method, caller.as_ref(), id).await?;

    deleted(state.social_repository.delete_comment(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}
