//! Shared state and informational endpoints.

use axum::{extract::State, Json};
use serde_json::json;

use crate::auth::TokenIssuer;
use crate::error::AppError;
use crate::services::UserService;

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(users: UserService, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }
    pub fn users(&self) -> &UserService {
        &self.users
    }
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

/// GET /
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to Bolt Backend API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health — readiness probe; pings the credential store.
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.users().ping().await?;
    Ok(Json(json!({ "status": "healthy", "database": "connected" })))
}
