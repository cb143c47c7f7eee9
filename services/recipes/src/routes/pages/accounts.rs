//! Registration, login and logout pages

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use common::error::DatabaseError;
use serde::Deserialize;
use tracing::{info, warn};

use super::{clear_session_cookie, escape, field_errors, page, safe_next, session_cookie};
use crate::{
    error::{ApiError, ApiResult, FieldErrors, NON_FIELD_ERRORS},
    extract::FormData,
    middleware::MaybeUser,
    models::{NewProfile, NewUser},
    serializers::hashed,
    session::SESSION_COOKIE,
    state::AppState,
    storage::UploadDir,
    validation::{
        INVALID_IMAGE, REQUIRED, validate_max_len, validate_password_strength, validate_username,
    },
};

const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

fn render_register(form: Option<&FormData>, errors: &FieldErrors) -> Html<String> {
    let value = |name: &str| escape(form.map(|f| f.text_or_empty(name)).unwrap_or_default());

    let body = format!(
        r#"<h1>Register</h1>{non_field}<form method="post" action="/accounts/register/" enctype="multipart/form-data">
<label>Username <input name="username" maxlength="150" value="{username}"></label>{username_errors}
<label>Password <input name="password1" type="password"></label>{password1_errors}
<label>Password confirmation <input name="password2" type="password"></label>{password2_errors}
<label>Full name <input name="full_name" maxlength="100" value="{full_name}"></label>{full_name_errors}
<label>Avatar <input name="avatar" type="file" accept="image/*"></label>{avatar_errors}
<label>Bio <textarea name="bio">{bio}</textarea></label>
<label>Parser <input name="parser" maxlength="100" value="{parser}"></label>{parser_errors}
<label>Be <input name="be" maxlength="100" value="{be}"></label>{be_errors}
<button type="submit">Register</button></form>"#,
        non_field = field_errors(errors, NON_FIELD_ERRORS),
        username = value("username"),
        username_errors = field_errors(errors, "username"),
        password1_errors = field_errors(errors, "password1"),
        password2_errors = field_errors(errors, "password2"),
        full_name = value("full_name"),
        full_name_errors = field_errors(errors, "full_name"),
        avatar_errors = field_errors(errors, "avatar"),
        bio = value("bio"),
        parser = value("parser"),
        parser_errors = field_errors(errors, "parser"),
        be = value("be"),
        be_errors = field_errors(errors, "be"),
    );

    page("Register", None, &body)
}

pub async fn register_form() -> Html<String> {
    render_register(None, &FieldErrors::new())
}

/// Field checks that need no database access
fn validate_registration(form: &FormData) -> FieldErrors {
    let mut errors = FieldErrors::new();

    errors.check("username", validate_username(form.text_or_empty("username")));

    let password1 = form.text_or_empty("password1");
    let password2 = form.text_or_empty("password2");
    if password1.is_empty() {
        errors.add("password1", REQUIRED);
    } else {
        errors.check("password1", validate_password_strength(password1));
    }
    if password2.is_empty() {
        errors.add("password2", REQUIRED);
    } else if !password1.is_empty() && password1 != password2 {
        errors.add("password2", "The two password fields didn't match.");
    }

    for field in ["full_name", "parser", "be"] {
        errors.check(field, validate_max_len(form.text_or_empty(field), Some(100)));
    }

    errors
}

/// Create the account and its profile, then log the new user in
///
/// The stored avatar is removed again when the account is not created.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    mut form: FormData,
) -> ApiResult<Response> {
    let mut errors = validate_registration(&form);

    let avatar = form.take_file("avatar");
    if let Some(avatar) = &avatar {
        if !avatar.is_image() {
            errors.add("avatar", INVALID_IMAGE);
        }
    }

    if !errors.contains("username")
        && state
            .user_repository
            .find_by_username(form.text_or_empty("username"))
            .await?
            .is_some()
    {
        errors.add("username", DUPLICATE_USERNAME);
    }

    if !errors.is_empty() {
        return Ok(render_register(Some(&form), &errors).into_response());
    }

    let avatar_path = match avatar {
        Some(file) => Some(
            state
                .storage
                .save(UploadDir::Avatars, &file)
                .await
                .map_err(|e| ApiError::internal("Failed to store avatar", e))?,
        ),
        None => None,
    };

    match create_account(&state, &form, avatar_path.as_deref()).await {
        Ok(Some(session_key)) => {
            Ok((jar.add(session_cookie(session_key)), Redirect::to("/")).into_response())
        }
        Ok(None) => {
            remove_avatar(&state, avatar_path.as_deref()).await;
            let errors = FieldErrors::single("username", DUPLICATE_USERNAME);
            Ok(render_register(Some(&form), &errors).into_response())
        }
        Err(e) => {
            remove_avatar(&state, avatar_path.as_deref()).await;
            Err(e)
        }
    }
}

/// Write the user and profile, open a session, and only then commit
///
/// Returns the session key, or `None` when the username was taken by a
/// concurrent registration.
async fn create_account(
    state: &AppState,
    form: &FormData,
    avatar_path: Option<&str>,
) -> ApiResult<Option<String>> {
    let new_user = NewUser {
        username: form.text_or_empty("username").to_string(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: hashed(form.text_or_empty("password1"))?,
    };
    let profile = NewProfile {
        full_name: form.text_or_empty("full_name").to_string(),
        avatar: avatar_path.map(str::to_string),
        bio: form.text_or_empty("bio").to_string(),
        parser: form.non_blank("parser"),
        be: form.non_blank("be"),
        ..Default::default()
    };

    let pending = match state
        .user_repository
        .begin_registration(&new_user, profile)
        .await
    {
        Ok(pending) => pending,
        Err(DatabaseError::UniqueViolation { .. }) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    // dropping `pending` on this path rolls the account back
    let session_key = state
        .session_manager
        .create_session(pending.user.id)
        .await
        .map_err(|e| ApiError::internal("Failed to create session", e))?;

    match pending.commit().await {
        Ok((user, _)) => {
            info!("Registered user {} through the form", user.id);
            Ok(Some(session_key))
        }
        Err(e) => {
            if let Err(e) = state.session_manager.delete_session(&session_key).await {
                warn!("Failed to delete session of a failed registration: {}", e);
            }
            Err(e.into())
        }
    }
}

async fn remove_avatar(state: &AppState, avatar_path: Option<&str>) {
    if let Some(path) = avatar_path {
        state.storage.remove(path).await;
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

fn render_login(username: &str, next: &str, errors: &FieldErrors) -> Html<String> {
    let body = format!(
        r#"<h1>Log in</h1>{non_field}<form method="post" action="/accounts/login/">
<label>Username <input name="username" value="{username}"></label>
<label>Password <input name="password" type="password"></label>
<input type="hidden" name="next" value="{next}">
<button type="submit">Log in</button></form>"#,
        non_field = field_errors(errors, NON_FIELD_ERRORS),
        username = escape(username),
        next = escape(next),
    );

    page("Log in", None, &body)
}

pub async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    render_login("", safe_next(query.next.as_deref()), &FieldErrors::new())
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: FormData,
) -> ApiResult<Response> {
    let username = form.text_or_empty("username");
    let password = form.text_or_empty("password");
    let next = safe_next(form.text("next"));

    let user = if username.is_empty() || password.is_empty() {
        None
    } else {
        state
            .user_repository
            .authenticate(username, password)
            .await?
    };

    let Some(user) = user else {
        let errors = FieldErrors::single(
            NON_FIELD_ERRORS,
            "Please enter a correct username and password.",
        );
        return Ok(render_login(username, next, &errors).into_response());
    };

    let session_key = state
        .session_manager
        .create_session(user.id)
        .await
        .map_err(|e| ApiError::internal("Failed to create session", e))?;
    info!("User {} logged in", user.id);

    Ok((jar.add(session_cookie(session_key)), Redirect::to(next)).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.session_manager.delete_session(cookie.value()).await {
            warn!("Failed to delete session: {}", e);
        }
    }
    if let Some(user) = user {
        info!("User {} logged out", user.id);
    }

    (clear_session_cookie(jar), Redirect::to("/")).into_response()
}
