//! Home page and the weekly plan placeholder

use axum::{extract::State, response::Html};

use super::{escape, page};
use crate::{error::ApiResult, middleware::MaybeUser, state::AppState};

/// Number of recipes listed on the home page
const LATEST_RECIPES: i64 = 10;

/// The most recently created recipes, newest first
pub async fn home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> ApiResult<Html<String>> {
    let recipes = state.recipe_repository.latest(LATEST_RECIPES).await?;
    let details = state.recipe_repository.load_details(recipes).await?;

    let items: String = details
        .iter()
        .map(|d| {
            format!(
                r#"<li><a href="/recipe/{id}/">{title}</a> by {author} <small>{difficulty}, {cook_time} min, {created}</small></li>"#,
                id = d.recipe.id,
                title = escape(&d.recipe.title),
                author = escape(&d.author.username),
                difficulty = d.recipe.difficulty.label(),
                cook_time = d.recipe.cook_time,
                created = d.recipe.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let body = if items.is_empty() {
        "<h1>Latest recipes</h1><p>No recipes yet.</p>".to_string()
    } else {
        format!(r#"<h1>Latest recipes</h1><ul class="recipes">{}</ul>"#, items)
    };

    Ok(page("Recipes", user.as_ref(), &body))
}

/// Placeholder until weekly planning gets a page of its own
pub async fn weekly_plan() -> &'static str {
    "The weekly plan will be here."
}
