//! Auth HTTP handlers: login, token refresh.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::BearerToken;
use crate::models::LoginRequest;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(body) = body.map_err(|e| {
        debug!(error = %e, "login body rejected");
        AppError::Validation("Invalid request".to_string())
    })?;

    let user = state
        .users()
        .authenticate(&body.email_id, &body.password)
        .await?;
    let token = state.tokens().issue(user.id, &user.email_id)?;
    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// POST /api/users/refresh
///
/// Purely a function of the presented token; the store is not consulted.
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.tokens().refresh(&token)?;
    Ok(Json(TokenResponse { token }))
}
