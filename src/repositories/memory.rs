//! In-process user collection. Used by tests and for running without Postgres.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::UserRepository;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserDocument};

/// Users kept in insertion order behind a shared lock. Clones share the same collection.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, doc: UserDocument) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email_id == doc.email_id) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        let user = User::from_document(Uuid::new_v4(), doc);
        users.push(user.clone());
        debug!(user_id = %user.id, "user inserted (memory)");
        Ok(user)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_email(&self, email_id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email_id == email_id).cloned())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
