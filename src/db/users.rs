//! `users` collection on Postgres: one JSONB document per row.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::{debug, info};
use uuid::Uuid;

use super::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserDocument};
use crate::repositories::UserRepository;

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    doc: Json<UserDocument>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_document(row.id, row.doc.0)
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create the namespace, the collection and its unique email index if absent.
    /// `schema` must already be a validated identifier.
    pub async fn ensure_collection(&self, schema: &str) -> Result<(), sqlx::Error> {
        sqlx::query(&format!(r#"CREATE SCHEMA IF NOT EXISTS "{}""#, schema))
            .execute(&self.pool)
            .await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id  UUID PRIMARY KEY,
                doc JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS users_email_id_key ON users ((doc->>'email_id'))",
        )
        .execute(&self.pool)
        .await?;
        info!(schema, "users collection ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, doc: UserDocument) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, doc)
            VALUES ($1, $2)
            RETURNING id, doc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Json(doc))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Email already registered".to_string())
            }
            _ => AppError::Db(e),
        })?;
        debug!(user_id = %row.id, "user inserted");
        Ok(row.into())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, doc FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_email(&self, email_id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, doc FROM users WHERE doc->>'email_id' = $1",
        )
        .bind(email_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn ping(&self) -> AppResult<()> {
        super::ping(&self.pool).await?;
        Ok(())
    }
}
