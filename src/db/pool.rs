//! PostgreSQL connection pool.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub type DbPool = sqlx::PgPool;

/// Connect with every session's `search_path` pointed at `database_name`,
/// so collections resolve inside that namespace.
pub async fn create_pool(
    database_url: &str,
    database_name: &str,
    acquire_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?.options([("search_path", database_name)]);
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await
}

pub async fn ping(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
