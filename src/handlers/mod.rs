//! HTTP request handlers.

pub mod http;
pub mod users;

pub use http::{health, index, AppState};
pub use users::{create_user, list_users};
