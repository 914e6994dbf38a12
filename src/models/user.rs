//! User record as stored in the `users` collection and as returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /api/users`. Absent fields deserialize as empty and fail validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email_id: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body of `POST /api/users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email_id: String,
    #[serde(default)]
    pub password: String,
}

/// Body of a user document. The identifier lives beside it, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    /// Argon2 PHC string.
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted user. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_document(id: Uuid, doc: UserDocument) -> Self {
        Self {
            id,
            first_name: doc.first_name,
            last_name: doc.last_name,
            email_id: doc.email_id,
            password_hash: doc.password_hash,
            created_at: doc.created_at,
        }
    }
}
