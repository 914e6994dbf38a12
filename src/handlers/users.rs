//! User collection handlers: create, list.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::debug;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::{CreateUserRequest, User};

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub count: usize,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let Json(body) = body.map_err(|e| {
        debug!(error = %e, "create user body rejected");
        AppError::Validation("Invalid request body".to_string())
    })?;

    let user = state.users().register(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, AppError> {
    let users = state.users().list().await?;
    let count = users.len();
    Ok(Json(UserListResponse { users, count }))
}
