//! Recipe detail (with comments) and the add-recipe form

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use super::{escape, field_errors, login_redirect, page};
use crate::{
    error::{ApiError, ApiResult, FieldErrors, NON_FIELD_ERRORS},
    extract::FormData,
    middleware::{AuthUser, MaybeUser},
    models::{Difficulty, NewComment},
    routes::api::users_by_id,
    serializers::RecipeInput,
    state::AppState,
    storage::{UploadDir, media_url},
    validation::validate_text,
};

async fn render_detail(
    state: &AppState,
    user: Option<&AuthUser>,
    id: i64,
    comment_text: &str,
    errors: &FieldErrors,
) -> ApiResult<Html<String>> {
    let recipe = state
        .recipe_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let details = state
        .recipe_repository
        .load_detail(recipe)
        .await?
        .ok_or(ApiError::NotFound)?;
    let comments = state.social_repository.comments_for_recipe(id).await?;
    let commenters = users_by_id(state, comments.iter().map(|c| c.user_id)).await?;

    let recipe = &details.recipe;
    let ingredients: String = details
        .ingredients
        .iter()
        .map(|(line, ingredient)| {
            format!(
                "<li>{} {} {}</li>",
                line.quantity.normalize(),
                line.unit.as_str(),
                escape(&ingredient.name)
            )
        })
        .collect();
    let tags: String = details
        .tags
        .iter()
        .map(|(_, tag)| format!(r#"<span class="tag">{}</span> "#, escape(&tag.name)))
        .collect();
    let images: String = details
        .images
        .iter()
        .map(|image| {
            format!(
                r#"<img src="{}" alt="{}">"#,
                escape(&media_url(&image.image_file)),
                escape(&recipe.title)
            )
        })
        .collect();
    let attachment = recipe
        .file
        .as_deref()
        .map(|file| format!(r#"<p><a href="{}">Attachment</a></p>"#, escape(&media_url(file))))
        .unwrap_or_default();
    let comment_items: String = comments
        .iter()
        .map(|comment| {
            let author = commenters
                .get(&comment.user_id)
                .map(|u| u.username.as_str())
                .unwrap_or("unknown");
            format!(
                "<li><strong>{}</strong> {}<p>{}</p></li>",
                escape(author),
                comment.created_at.format("%Y-%m-%d %H:%M"),
                escape(&comment.text)
            )
        })
        .collect();

    let comment_form = match user {
        Some(_) => format!(
            r#"<form method="post" action="/recipe/{id}/"><textarea name="text">{text}</textarea>{errors}<button type="submit">Comment</button></form>"#,
            id = recipe.id,
            text = escape(comment_text),
            errors = field_errors(errors, "text"),
        ),
        None => format!(
            r#"<p><a href="/accounts/login/?next=/recipe/{}/">Log in</a> to comment.</p>"#,
            recipe.id
        ),
    };

    let body = format!(
        r#"<article><h1>{title}</h1><p class="meta">by {author}, {difficulty}, {cook_time} min, {calories} kcal</p><div class="tags">{tags}</div>{images}<p>{description}</p><h2>Ingredients</h2><ul>{ingredients}</ul><h2>Instructions</h2><p>{instructions}</p>{attachment}</article><section><h2>Comments</h2><ul class="comments">{comment_items}</ul>{comment_form}</section>"#,
        title = escape(&recipe.title),
        author = escape(&details.author.username),
        difficulty = recipe.difficulty.label(),
        cook_time = recipe.cook_time,
        calories = recipe.calories,
        description = escape(&recipe.description),
        instructions = escape(&recipe.instructions),
    );

    Ok(page(&recipe.title, user, &body))
}

pub async fn recipe_detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<Html<String>> {
    render_detail(&state, user.as_ref(), id, "", &FieldErrors::new()).await
}

/// Add a comment as the session user
pub async fn post_comment(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
    form: FormData,
) -> ApiResult<Response> {
    let Some(user) = user else {
        return Ok(login_redirect(&format!("/recipe/{}/", id)).into_response());
    };

    let text = form.text_or_empty("text");
    let mut errors = FieldErrors::new();
    errors.check("text", validate_text(text, None));
    if !errors.is_empty() {
        return Ok(render_detail(&state, Some(&user), id, text, &errors)
            .await?
            .into_response());
    }

    if state.recipe_repository.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    state
        .social_repository
        .create_comment(&NewComment {
            user_id: user.id,
            recipe_id: id,
            text: text.to_string(),
        })
        .await?;

    Ok(Redirect::to(&format!("/recipe/{}/", id)).into_response())
}

fn render_add_form(user: &AuthUser, form: Option<&FormData>, errors: &FieldErrors) -> Html<String> {
    let value = |name: &str| escape(form.map(|f| f.text_or_empty(name)).unwrap_or_default());
    let selected = form.and_then(|f| f.text("difficulty")).unwrap_or_default();
    let options: String = Difficulty::ALL
        .iter()
        .map(|d| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                d.as_str(),
                if d.as_str() == selected { " selected" } else { "" },
                d.label()
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Add recipe</h1>{non_field}<form method="post" action="/add-recipe/" enctype="multipart/form-data">
<label>Title <input name="title" maxlength="200" value="{title}"></label>{title_errors}
<label>Description <textarea name="description">{description}</textarea></label>{description_errors}
<label>Instructions <textarea name="instructions">{instructions}</textarea></label>{instructions_errors}
<label>Cook time (minutes) <input name="cook_time" type="number" min="0" value="{cook_time}"></label>{cook_time_errors}
<label>Difficulty <select name="difficulty">{options}</select></label>{difficulty_errors}
<label>Calories <input name="calories" type="number" min="0" value="{calories}"></label>{calories_errors}
<label>File <input name="file" type="file"></label>
<button type="submit">Save</button></form>"#,
        non_field = field_errors(errors, NON_FIELD_ERRORS),
        title = value("title"),
        title_errors = field_errors(errors, "title"),
        description = value("description"),
        description_errors = field_errors(errors, "description"),
        instructions = value("instructions"),
        instructions_errors = field_errors(errors, "instructions"),
        cook_time = value("cook_time"),
        cook_time_errors = field_errors(errors, "cook_time"),
        difficulty_errors = field_errors(errors, "difficulty"),
        calories = value("calories"),
        calories_errors = field_errors(errors, "calories"),
    );

    page("Add recipe", Some(user), &body)
}

pub async fn add_recipe_form(MaybeUser(user): MaybeUser) -> Response {
    match user {
        Some(user) => render_add_form(&user, None, &FieldErrors::new()).into_response(),
        None => login_redirect("/add-recipe/").into_response(),
    }
}

/// Parse an optional whole number form field
fn whole_number(form: &FormData, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    let raw = form.text_or_empty(field).trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "Enter a whole number.");
            None
        }
    }
}

/// Create a recipe authored by the session user
pub async fn add_recipe(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    mut form: FormData,
) -> ApiResult<Response> {
    let Some(user) = user else {
        return Ok(login_redirect("/add-recipe/").into_response());
    };

    let mut errors = FieldErrors::new();
    let cook_time = whole_number(&form, "cook_time", &mut errors);
    let calories = whole_number(&form, "calories", &mut errors);
    let input = RecipeInput {
        title: form.text("title").map(str::to_string),
        description: form.text("description").map(str::to_string),
        instructions: form.text("instructions").map(str::to_string),
        created_at: None,
        cook_time,
        difficulty: form.non_blank("difficulty"),
        calories,
    };

    let new_recipe = match input.into_new(user.id) {
        Ok(new_recipe) if errors.is_empty() => Some(new_recipe),
        Ok(_) => None,
        Err(validation) => {
            // A field that failed to parse is already reported
            for (field, messages) in validation.iter() {
                if !errors.contains(field) {
                    for message in messages {
                        errors.add(field, message.clone());
                    }
                }
            }
            None
        }
    };
    let Some(mut new_recipe) = new_recipe else {
        return Ok(render_add_form(&user, Some(&form), &errors).into_response());
    };

    if let Some(file) = form.take_file("file") {
        let path = state
            .storage
            .save(UploadDir::RecipeFiles, &file)
            .await
            .map_err(|e| ApiError::internal("Failed to store recipe file", e))?;
        new_recipe.file = Some(path);
    }

    let recipe = state.recipe_repository.create(&new_recipe).await?;
    info!("User {} added recipe {} through the form", user.id, recipe.id);

    Ok(Redirect::to("/").into_response())
}

