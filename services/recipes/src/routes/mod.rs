//! Recipe service routes

mod api;
mod pages;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{middleware::identity_middleware, state::AppState, storage::MEDIA_URL};

/// Largest accepted request body (uploads included)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the router for the recipe service
pub fn create_router(state: AppState) -> Router {
    let media = ServeDir::new(state.config.media_root.clone());

    Router::new()
        .route("/health", get(health_check))
        .merge(api::router())
        .merge(pages::router())
        .nest_service(MEDIA_URL.trim_end_matches('/'), media)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "recipes"
    }))
}
