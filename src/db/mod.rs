//! Database layer: pool and the Postgres-backed `users` collection.

mod pool;
mod users;

pub use pool::{create_pool, ping, DbPool};
pub use users::PgUserRepository;
