//! `/api/auth/token/`: exchange credentials for an access token

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult, FieldErrors, NON_FIELD_ERRORS},
    extract::ApiJson,
    serializers::require,
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

pub async fn obtain_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "username", &request.username, false);
    require(&mut errors, "password", &request.password, false);
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(errors.into());
    };

    let user = state
        .user_repository
        .authenticate(&username, &password)
        .await?
        .ok_or_else(|| {
            ApiError::from(FieldErrors::single(
                NON_FIELD_ERRORS,
                "Unable to log in with provided credentials.",
            ))
        })?;

    let access_token = state
        .jwt_service
        .generate_access_token(&user)
        .map_err(|e| ApiError::internal("Failed to sign access token", e))?;
    info!("Issued access token for user {}", user.id);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_expiry(),
    }))
}
