//! Entry point: load config, connect the store, and run the server.

use bolt::auth::{PasswordService, TokenIssuer};
use bolt::config::Config;
use bolt::db::{self, PgUserRepository};
use bolt::{create_app, AppState, UserService};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config.database_url, &config.database_name, config.store_timeout)
        .await
        .map_err(|e| anyhow::anyhow!("connect to database: {}", e))?;
    db::ping(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("ping database: {}", e))?;
    let repo = PgUserRepository::new(db_pool.clone());
    repo.ensure_collection(&config.database_name).await?;
    tracing::info!(database = %config.database_name, "connected to database");

    let passwords =
        PasswordService::new(config.password_hash_iterations, config.password_hash_memory_kib)?;
    let users = UserService::new(Arc::new(repo), passwords, config.store_timeout);
    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl)?;
    let app = create_app(AppState::new(users, tokens));

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("database connection closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("gracefully shutting down");
}
