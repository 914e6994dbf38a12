//! Credential store abstraction: the `users` document collection.

mod memory;

pub use memory::MemoryUserRepository;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{User, UserDocument};

/// Insert-one / find-all / find-one-by-email over the `users` collection.
///
/// Implementations must reject a second document with an existing `email_id`
/// with [`AppError::Conflict`](crate::error::AppError::Conflict).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a document; the store assigns the identifier.
    async fn insert(&self, doc: UserDocument) -> AppResult<User>;

    /// All users in store-native order.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    async fn find_by_email(&self, email_id: &str) -> AppResult<Option<User>>;

    /// Cheap connectivity check used by `/health`.
    async fn ping(&self) -> AppResult<()>;
}
