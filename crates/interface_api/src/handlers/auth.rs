//! Registration and login handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::dto::auth::*;
use crate::extractors::ApiJson;
use crate::{error::ApiError, AppState};

/// Creates a user account
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.auth.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges credentials for a token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state.auth.login(request.into()).await?;
    Ok(Json(LoginResponse {
        message: "login successful".to_string(),
        token: session.token,
    }))
}
