//! `/api/profiles/`

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};

use super::{deleted, found, referenced_user, users_by_id};
use crate::{
    error::{ApiError, ApiResult, FieldErrors},
    extract::{ApiJson, FormData},
    middleware::{AuthUser, MaybeUser},
    models::Profile,
    permissions::{authenticated_or_read_only, owner_or_read_only},
    serializers::{ProfileInput, ProfileOut, ProfileQuery},
    state::AppState,
    storage::UploadDir,
    validation::{INVALID_IMAGE, REQUIRED},
};

async fn render(state: &AppState, profile: &Profile) -> ApiResult<ProfileOut> {
    let user = referenced_user(state, profile.user_id).await?;
    Ok(ProfileOut::new(profile, &user))
}

/// Fetch a profile the caller is allowed to modify
async fn writable_profile(
    state: &AppState,
    method: &Method,
    caller: Option<&AuthUser>,
    id: i64,
) -> ApiResult<Profile> {
    authenticated_or_read_only(method, caller)?;
    let profile = found(state.profile_repository.find_by_id(id).await?)?;
    owner_or_read_only(method, caller, &profile)?;
    Ok(profile)
}

pub async fn list_profiles(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<Vec<ProfileOut>>> {
    let profiles = state.profile_repository.list(&query).await?;
    let users = users_by_id(&state, profiles.iter().map(|p| p.user_id)).await?;

    Ok(Json(
        profiles
            .iter()
            .filter_map(|p| users.get(&p.user_id).map(|u| ProfileOut::new(p, u)))
            .collect(),
    ))
}

/// The profile always belongs to the caller, whatever the body says
pub async fn create_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(input): ApiJson<ProfileInput>,
) -> ApiResult<impl IntoResponse> {
    let new_profile = input.into_new(caller.id)?;
    let profile = state.profile_repository.create(&new_profile).await?;

    Ok((StatusCode::CREATED, Json(render(&state, &profile).await?)))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProfileOut>> {
    let profile = found(state.profile_repository.find_by_id(id).await?)?;
    Ok(Json(render(&state, &profile).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<ProfileInput>,
) -> ApiResult<Json<ProfileOut>> {
    writable_profile(&state, &method, caller.as_ref(), id).await?;

    let update = input.into_update()?;
    let profile = found(state.profile_repository.update(id, &update).await?)?;
    Ok(Json(render(&state, &profile).await?))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    writable_profile(&state, &method, caller.as_ref(), id).await?;

    deleted(state.profile_repository.delete(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Multipart upload of the `avatar` field
pub async fn upload_avatar(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    mut form: FormData,
) -> ApiResult<Json<ProfileOut>> {
    writable_profile(&state, &method, caller.as_ref(), id).await?;

    let file = form
        .take_file("avatar")
        .ok_or_else(|| ApiError::from(FieldErrors::single("avatar", REQUIRED)))?;
    if !file.is_image() {
        return Err(FieldErrors::single("avatar", INVALID_IMAGE).into());
    }

    let path = state
        .storage
        .save(UploadDir::Avatars, &file)
        .await
        .map_err(|e| ApiError::internal("Failed to store avatar", e))?;
    let profile = found(state.profile_repository.set_avatar(id, &path).await?)?;
    Ok(Json(render(&state, &profile).await?))
}
