//! Weekly plans, mounted at `/api/weight-runs/` and `/api/weekly-plans/`

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
};

use super::{
    deleted, ensure_recipes_exist, ensure_user_exists, found, render_recipes, users_by_id,
};
use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    middleware::{AuthUser, MaybeUser},
    models::WeeklyPlan,
    permissions::authenticated_or_read_only,
    serializers::{RecipeOut, WeeklyPlanInput, WeeklyPlanOut},
    state::AppState,
};

pub fn router(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/", prefix),
            get(list_plans).post(create_plan),
        )
        .route(
            &format!("{}/:id/", prefix),
            get(get_plan)
                .put(update_plan)
                .patch(update_plan)
                .delete(delete_plan),
        )
}

/// Render plans with their owners and full nested recipes
async fn render_plans(state: &AppState, plans: Vec<WeeklyPlan>) -> ApiResult<Vec<WeeklyPlanOut>> {
    let plan_ids: Vec<i64> = plans.iter().map(|p| p.id).collect();
    let mut recipe_ids = state.plan_repository.recipe_ids_for(&plan_ids).await?;

    let mut all_recipe_ids: Vec<i64> = recipe_ids.values().flatten().copied().collect();
    all_recipe_ids.sort_unstable();
    all_recipe_ids.dedup();
    let recipes = state.recipe_repository.find_many(&all_recipe_ids).await?;
    let rendered: HashMap<i64, RecipeOut> = render_recipes(state, recipes)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    let users = users_by_id(state, plans.iter().map(|p| p.user_id)).await?;

    Ok(plans
        .iter()
        .filter_map(|plan| {
            let user = users.get(&plan.user_id)?;
            let recipes = recipe_ids
                .remove(&plan.id)
                .unwrap_or_default()
                .iter()
                .filter_map(|id| rendered.get(id).cloned())
                .collect();
            Some(WeeklyPlanOut::new(plan, user, recipes))
        })
        .collect())
}

async fn render_plan(state: &AppState, plan: WeeklyPlan) -> ApiResult<WeeklyPlanOut> {
    render_plans(state, vec![plan])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal("Weekly plan owner vanished", "render"))
}

pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Json<Vec<WeeklyPlanOut>>> {
    let plans = state.plan_repository.list().await?;
    Ok(Json(render_plans(&state, plans).await?))
}

/// `user` defaults to the caller
pub async fn create_plan(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(input): ApiJson<WeeklyPlanInput>,
) -> ApiResult<impl IntoResponse> {
    let new_plan = input.into_new(caller.id)?;
    if new_plan.user_id != caller.id {
        ensure_user_exists(&state, "user", new_plan.user_id).await?;
    }
    ensure_recipes_exist(&state, "recipes", &new_plan.recipe_ids).await?;

    let plan = state.plan_repository.create(&new_plan).await?;
    Ok((StatusCode::CREATED, Json(render_plan(&state, plan).await?)))
}

pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<WeeklyPlanOut>> {
    let plan = found(state.plan_repository.find_by_id(id).await?)?;
    Ok(Json(render_plan(&state, plan).await?))
}

pub async fn update_plan(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<WeeklyPlanInput>,
) -> ApiResult<Json<WeeklyPlanOut>> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    let update = input.into_update(method == Method::PATCH)?;
    if let Some(user_id) = update.user_id {
        ensure_user_exists(&state, "user", user_id).await?;
    }
    if let Some(recipe_ids) = &update.recipe_ids {
        ensure_recipes_exist(&state, "recipes", recipe_ids).await?;
    }

    let plan = found(state.plan_repository.update(id, &update).await?)?;
    Ok(Json(render_plan(&state, plan).await?))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    method: Method,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authenticated_or_read_only(&method, caller.as_ref())?;

    deleted(state.plan_repository.delete(id).await?)?;
    Ok(StatusCode::NO_CONTENT)
}
