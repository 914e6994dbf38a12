//! User accounts API built with Rust.
//!
//! Registration, listing, login and JWT refresh over a document-style
//! `users` collection (Postgres JSONB, or in-memory for tests).

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::AppState;
pub use services::UserService;

use axum::routing::{get, post};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router (index, health, users). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let user_routes = axum::Router::new()
        .route("/", post(handlers::create_user).get(handlers::list_users))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh));

    axum::Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .nest("/api/users", user_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
