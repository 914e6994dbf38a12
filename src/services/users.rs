//! User registration, listing and credential checks over a [`UserRepository`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::PasswordService;
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, User, UserDocument};
use crate::repositories::UserRepository;

pub const REQUIRED_FIELDS: &str =
    "All fields are required: first_name, last_name, email_id, password";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Every store call goes through [`UserService::store_call`], which bounds it by `timeout`.
/// Argon2 work runs on the blocking pool.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    passwords: PasswordService,
    timeout: Duration,
    /// Verified against when the email is unknown, so both login failures cost one Argon2 run.
    decoy_hash: Arc<OnceCell<String>>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, passwords: PasswordService, timeout: Duration) -> Self {
        Self {
            repo,
            passwords,
            timeout,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Validate, hash and insert. Nothing is written when validation or hashing fails.
    pub async fn register(&self, input: CreateUserRequest) -> AppResult<User> {
        input
            .validate()
            .map_err(|_| AppError::Validation(REQUIRED_FIELDS.to_string()))?;

        let password_hash = self.hash_password(input.password).await?;
        let doc = UserDocument {
            first_name: input.first_name,
            last_name: input.last_name,
            email_id: input.email_id,
            password_hash,
            created_at: Utc::now(),
        };

        let user = self
            .store_call("Failed to create user", self.repo.insert(doc))
            .await
            .inspect_err(|e| {
                if let AppError::Conflict(_) = e {
                    warn!("registration with existing email");
                }
            })?;
        info!(user_id = %user.id, email = %user.email_id, "user registered");
        Ok(user)
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.store_call("Failed to fetch users", self.repo.find_all())
            .await
    }

    /// Unknown email and wrong password fail identically, and both pay for a verification.
    pub async fn authenticate(&self, email_id: &str, password: &str) -> AppResult<User> {
        let found = self
            .store_call("Failed to fetch user", self.repo.find_by_email(email_id))
            .await?;

        let Some(user) = found else {
            let decoy = self
                .decoy_hash
                .get_or_try_init(|| self.hash_password(Uuid::new_v4().to_string()))
                .await?
                .clone();
            self.verify_password(password.to_string(), decoy).await?;
            warn!(email = %email_id, "login unknown email");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        };

        if !self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?
        {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }
        Ok(user)
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store_call("Database unreachable", self.repo.ping())
            .await
            .map_err(|e| match e {
                AppError::Storage(msg) => AppError::Unavailable(msg),
                other => other,
            })
    }

    async fn hash_password(&self, password: String) -> AppResult<String> {
        let passwords = self.passwords.clone();
        blocking(move || passwords.hash_password(&password)).await
    }

    async fn verify_password(&self, password: String, hash: String) -> AppResult<bool> {
        let passwords = self.passwords.clone();
        blocking(move || passwords.verify_password(&password, &hash)).await
    }

    /// Run a store call under the timeout. Driver failures and timeouts become
    /// `Storage(failure)`; domain errors such as `Conflict` pass through.
    async fn store_call<T, F>(&self, failure: &'static str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(AppError::Db(e))) => {
                error!(error = %e, "{}", failure);
                Err(AppError::Storage(failure.to_string()))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                error!(timeout_ms, "{}: store call timed out", failure);
                Err(AppError::Storage(failure.to_string()))
            }
        }
    }
}

async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("blocking task: {}", e)))?
}
