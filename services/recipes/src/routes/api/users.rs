//! `/api/users/`

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};
use tracing::info;

use super::{deleted, found};
use crate::{
    error::ApiResult,
    extract::ApiJson,
    middleware::MaybeUser,
    permissions::user_write,
    serializers::{UserInput, UserOut, UserQuery},
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<UserOut>>> {
    let users = state.user_repository.list(&query).await?;
    Ok(Json(users.iter().map(UserOut::from).collect()))
}

/// Registration through the API, open to anonymous callers
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<impl IntoResponse> {
    let new_user = input.into_new()?;
    let user = state.user_repository.create(&new_user).await?;
    info!("Registered user {} through the API", user.id);

    Ok((StatusCode::CREATED, Json(UserOut::from(&user))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserOut>> {
    let user = found(state.user_repository.find_by_id(id).await?)?;
    Ok(Json(UserOut::from(&user)))
}

/// PUT replaces, PATCH merges
pub async fn update_user(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<Json<UserOut>> {
    user_write(state.config.user_write_policy(), caller.as_ref(), id)?;

    let update = input.into_update(method == Method::PATCH)?;
    let user = found(state.user_repository.update(id, &update).await?)?;
    Ok(Json(UserOut::from(&user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    user_write(state.config.user_write_policy(), caller.as_ref(), id)?;

    deleted(state.user_repository.delete(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}
