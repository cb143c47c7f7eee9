//! `/api/recipes/` and the recipe sub-resources

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};
use tracing::info;

use super::{deleted, found, referenced_user, render_recipe, render_recipes};
use crate::{
    error::{ApiError, ApiResult, FieldErrors},
    extract::{ApiJson, FormData},
    middleware::{AuthUser, MaybeUser},
    models::Recipe,
    permissions::{authenticated_or_read_only, owner_or_read_only},
    serializers::{
        CommentInput, CommentOut, RecipeImageOut, RecipeIngredientInput, RecipeIngredientOut,
        RecipeInput, RecipeOut, RecipeQuery,
    },
    state::AppState,
    storage::UploadDir,
    validation::{INVALID_IMAGE, REQUIRED},
};

/// Fetch a recipe the caller is allowed to modify
async fn writable_recipe(
    state: &AppState,
    method: &Method,
    caller: Option<&AuthUser>,
    id: i64,
) -> ApiResult<Recipe> {
    authenticated_or_read_only(method, caller)?;
    let recipe = found(state.recipe_repository.find_by_id(id).await?)?;
    owner_or_read_only(method, caller, &recipe)?;
    Ok(recipe)
}

pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> ApiResult<Json<Vec<RecipeOut>>> {
    let recipes = state.recipe_repository.list(&query).await?;
    Ok(Json(render_recipes(&state, recipes).await?))
}

/// The author is always the caller
pub async fn create_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(input): ApiJson<RecipeInput>,
) -> ApiResult<impl IntoResponse> {
    let new_recipe = input.into_new(caller.id)?;
    let recipe = state.recipe_repository.create(&new_recipe).await?;
    info!("User {} published recipe {}", caller.id, recipe.id);

    Ok((StatusCode::CREATED, Json(render_recipe(&state, recipe).await?)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RecipeOut>> {
    let recipe = found(state.recipe_repository.find_by_id(id).await?)?;
    Ok(Json(render_recipe(&state, recipe).await?))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<RecipeInput>,
) -> ApiResult<Json<RecipeOut>> {
    writable_recipe(&state, &method, caller.as_ref(), id).await?;

    let update = input.into_update(method == Method::PATCH)?;
    let recipe = found(state.recipe_repository.update(id, &update).await?)?;
    Ok(Json(render_recipe(&state, recipe).await?))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    writable_recipe(&state, &method, caller.as_ref(), id).await?;

    deleted(state.recipe_repository.delete(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Comment on the recipe in the path; `recipe` and `user` in the body are ignored
pub async fn comment_on_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<CommentInput>,
) -> ApiResult<impl IntoResponse> {
    let recipe = found(state.recipe_repository.find_by_id(id).await?)?;

    let new_comment = input.into_new(caller.id, Some(recipe.id))?;
    let comment = state.social_repository.create_comment(&new_comment).await?;
    let user = referenced_user(&state, comment.user_id).await?;

    Ok((StatusCode::CREATED, Json(CommentOut::new(&comment, &user))))
}

/// Add an ingredient line, creating the catalog ingredient by name if needed
pub async fn add_ingredient(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<RecipeIngredientInput>,
) -> ApiResult<impl IntoResponse> {
    let recipe = writable_recipe(&state, &method, caller.as_ref(), id).await?;

    let new_line = input.into_new(recipe.id)?;
    let (line, ingredient) = state.recipe_repository.add_ingredient(&new_line).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeIngredientOut::new(&line, &ingredient)),
    ))
}

/// Multipart upload of the `image_file` field
pub async fn upload_image(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let recipe = writable_recipe(&state, &method, caller.as_ref(), id).await?;

    let file = form
        .take_file("image_file")
        .ok_or_else(|| ApiError::from(FieldErrors::single("image_file", REQUIRED)))?;
    if !file.is_image() {
        return Err(FieldErrors::single("image_file", INVALID_IMAGE).into());
    }

    let path = state
        .storage
        .save(UploadDir::RecipeImages, &file)
        .await
        .map_err(|e| ApiError::internal("Failed to store recipe image", e))?;
    let image = state.recipe_repository.add_image(recipe.id, &path).await?;

    Ok((StatusCode::CREATED, Json(RecipeImageOut::from(&image))))
}

/// Multipart upload of the `file` field, replacing any previous attachment
pub async fn upload_file(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    mut form: FormData,
) -> ApiResult<Json<RecipeOut>> {
    let recipe = writable_recipe(&state, &method, caller.as_ref(), id).await?;

    let file = form
        .take_file("file")
        .ok_or_else(|| ApiError::from(FieldErrors::single("file", REQUIRED)))?;
    let path = state
        .storage
        .save(UploadDir::RecipeFiles, &file)
        .await
        .map_err(|e| ApiError::internal("Failed to store recipe file", e))?;

    let recipe = found(state.recipe_repository.set_file(recipe.id, &path).await?)?;
    Ok(Json(render_recipe(&state, recipe).await?))
}
