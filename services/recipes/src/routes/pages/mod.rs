//! Server-rendered HTML pages

mod accounts;
mod home;
mod recipes;

use axum::{
    Router,
    response::{Html, Redirect},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::FieldErrors, middleware::AuthUser, session::SESSION_COOKIE, state::AppState,
};

/// Build the page route table
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/weekly-plan/", get(home::weekly_plan))
        .route(
            "/recipe/:id/",
            get(recipes::recipe_detail).post(recipes::post_comment),
        )
        .route(
            "/add-recipe/",
            get(recipes::add_recipe_form).post(recipes::add_recipe),
        )
        .route(
            "/accounts/register/",
            get(accounts::register_form).post(accounts::register),
        )
        .route(
            "/accounts/login/",
            get(accounts::login_form).post(accounts::login),
        )
        .route("/accounts/logout/", post(accounts::logout))
}

/// Escape text for HTML element and attribute content
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap `body` in the site layout
pub(crate) fn page(title: &str, user: Option<&AuthUser>, body: &str) -> Html<String> {
    let account = match user {
        Some(user) => format!(
            r#"<span>{}</span> <form method="post" action="/accounts/logout/" class="inline"><button type="submit">Log out</button></form>"#,
            escape(&user.username)
        ),
        None => r#"<a href="/accounts/login/">Log in</a> <a href="/accounts/register/">Register</a>"#
            .to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><title>{title}</title></head><body><nav><a href="/">Recipes</a> <a href="/add-recipe/">Add recipe</a> <a href="/weekly-plan/">Weekly plan</a> {account}</nav><main>{body}</main></body></html>"#,
        title = escape(title),
    ))
}

/// Inline error list for one form field
pub(crate) fn field_errors(errors: &FieldErrors, field: &str) -> String {
    let messages = errors.get(field);
    if messages.is_empty() {
        return String::new();
    }

    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!(r#"<ul class="errorlist">{}</ul>"#, items)
}

/// Send an anonymous visitor to the login page, coming back to `next` afterwards
pub(crate) fn login_redirect(next: &str) -> Redirect {
    Redirect::to(&format!("/accounts/login/?next={}", next))
}

/// Only same-site absolute paths are followed after login
pub(crate) fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => "/",
    }
}

pub(crate) fn session_cookie(session_key: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_key))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Drop the session cookie from the browser
pub(crate) fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
