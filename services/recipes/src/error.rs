//! Custom error types for the recipe service

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Field name used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Validation messages keyed by input field
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message for `field`
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the outcome of a `validate_*` helper under `field`
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterate over `(field, messages)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded, the validation error otherwise
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// Custom error type for the recipe service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Write attempted without credentials, or with invalid ones
    #[error("Authentication credentials were not provided.")]
    Unauthorized,

    /// Authenticated but not allowed to touch the resource
    #[error("You do not have permission to perform this action.")]
    Forbidden,

    /// Unknown identifier
    #[error("Not found.")]
    NotFound,

    /// Field-level validation failure
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// Log an unexpected failure and hide it behind a 500
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        error!("{}: {}", context, err);
        ApiError::InternalServerError
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Human readable message for a violated unique constraint
pub fn conflict_message(constraint: &str) -> String {
    match constraint {
        "users_username_key" => "A user with that username already exists.".to_string(),
        "profiles_user_id_key" => "This user already has a profile.".to_string(),
        "tags_name_key" => "A tag with this name already exists.".to_string(),
        "ingredients_name_key" => "An ingredient with this name already exists.".to_string(),
        "recipe_tags_recipe_id_tag_id_key" => {
            "The fields recipe, tag must make a unique set.".to_string()
        }
        "favorites_user_id_recipe_id_key" | "likes_user_id_recipe_id_key" => {
            "The fields user, recipe must make a unique set.".to_string()
        }
        other => format!("Duplicate value violates unique constraint {}.", other),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "fields": fields }),
            ),
            ApiError::Unauthorized | ApiError::Forbidden | ApiError::NotFound => {
                let status = match self {
                    ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
                    ApiError::Forbidden => StatusCode::FORBIDDEN,
                    _ => StatusCode::NOT_FOUND,
                };
                (status, json!({ "error": self.to_string() }))
            }
            ApiError::Database(DatabaseError::UniqueViolation { constraint }) => (
                StatusCode::CONFLICT,
                json!({ "error": conflict_message(&constraint) }),
            ),
            ApiError::Database(DatabaseError::ForeignKeyViolation { constraint }) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "fields": FieldErrors::single(
                        NON_FIELD_ERRORS,
                        format!("Referenced object does not exist ({}).", constraint),
                    ),
                }),
            ),
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
