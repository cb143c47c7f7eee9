//! `/api/tags/`, `/api/ingredients/` and `/api/recipe-tags/`
//!
//! Writes only require an authenticated caller.

use axum::{
    Json,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};

use super::{deleted, ensure_recipes_exist, found, invalid_pk};
use crate::{
    error::{ApiResult, FieldErrors},
    extract::ApiJson,
    middleware::{AuthUser, MaybeUser},
    permissions::authenticated_or_read_only,
    serializers::{IngredientInput, IngredientOut, RecipeTagInput, RecipeTagOut, TagInput, TagOut},
    state::AppState,
};

pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<TagOut>>> {
    let tags = state.catalog_repository.list_tags().await?;
    Ok(Json(tags.iter().map(TagOut::from).collect()))
}

pub async fn create_tag(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiJson(input): ApiJson<TagInput>,
) -> ApiResult<impl IntoResponse> {
    let name = input.into_name()?;
    let tag = state.catalog_repository.create_tag(&name).await?;
    Ok((StatusCode::CREATED, Json(TagOut::from(&tag))))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TagOut>> {
    let tag = found(state.catalog_repository.find_tag(id).await?)?;
    Ok(Json(TagOut::from(&tag)))
}

pub async fn update_tag(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<TagInput>,
) -> ApiResult<Json<TagOut>> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    let name = input.into_name()?;
    let tag = found(state.catalog_repository.rename_tag(id, &name).await?)?;
    Ok(Json(TagOut::from(&tag)))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    deleted(state.catalog_repository.delete_tag(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_ingredients(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<IngredientOut>>> {
    let ingredients = state.catalog_repository.list_ingredients().await?;
    Ok(Json(ingredients.iter().map(IngredientOut::from).collect()))
}

pub async fn create_ingredient(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiJson(input): ApiJson<IngredientInput>,
) -> ApiResult<impl IntoResponse> {
    let name = input.into_name()?;
    let ingredient = state.catalog_repository.create_ingredient(&name).await?;
    Ok((StatusCode::CREATED, Json(IngredientOut::from(&ingredient))))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<IngredientOut>> {
    let ingredient = found(state.catalog_repository.find_ingredient(id).await?)?;
    Ok(Json(IngredientOut::from(&ingredient)))
}

pub async fn update_ingredient(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<IngredientInput>,
) -> ApiResult<Json<IngredientOut>> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    let name = input.into_name()?;
    let ingredient = found(
        state
            .catalog_repository
            .rename_ingredient(id, &name)
            .await?,
    )?;
    Ok(Json(IngredientOut::from(&ingredient)))
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    deleted(state.catalog_repository.delete_ingredient(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_tag_exists(state: &AppState, id: i64) -> ApiResult<()> {
    match state.catalog_repository.find_tag(id).await? {
        Some(_) => Ok(()),
        None => Err(FieldErrors::single("tag", invalid_pk(id)).into()),
    }
}

async fn render_link(state: &AppState, id: i64) -> ApiResult<RecipeTagOut> {
    let (link, tag) = found(state.catalog_repository.find_recipe_tag(id).await?)?;
    Ok(RecipeTagOut::new(&link, &tag))
}

pub async fn list_recipe_tags(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RecipeTagOut>>> {
    let links = state.catalog_repository.list_recipe_tags().await?;
    Ok(Json(
        links
            .iter()
            .map(|(link, tag)| RecipeTagOut::new(link, tag))
            .collect(),
    ))
}

/// A duplicate (recipe, tag) pair is a conflict
pub async fn create_recipe_tag(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiJson(input): ApiJson<RecipeTagInput>,
) -> ApiResult<impl IntoResponse> {
    let new_link = input.into_new()?;
    ensure_recipes_exist(&state, "recipe", &[new_link.recipe_id]).await?;
    ensure_tag_exists(&state, new_link.tag_id).await?;

    let link = state.catalog_repository.create_recipe_tag(&new_link).await?;
    Ok((StatusCode::CREATED, Json(render_link(&state, link.id).await?)))
}

pub async fn get_recipe_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RecipeTagOut>> {
    Ok(Json(render_link(&state, id).await?))
}

pub async fn update_recipe_tag(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<RecipeTagInput>,
) -> ApiResult<Json<RecipeTagOut>> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    let (recipe_id, tag_id) = input.into_update(method == Method::PATCH)?;
    if let Some(recipe_id) = recipe_id {
        ensure_recipes_exist(&state, "recipe", &[recipe_id]).await?;
    }
    if let Some(tag_id) = tag_id {
        ensure_tag_exists(&state, tag_id).await?;
    }

    let link = found(
        state
            .catalog_repository
            .update_recipe_tag(id, recipe_id, tag_id)
            .await?,
    )?;
    Ok(Json(render_link(&state, link.id).await?))
}

pub async fn delete_recipe_tag(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    deleted(state.catalog_repository.delete_recipe_tag(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}
