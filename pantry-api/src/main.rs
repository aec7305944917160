//! # Pantry API Server
//!
//! Loads configuration, opens the database pool, applies migrations and
//! serves the operation gateway until SIGINT or SIGTERM.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/pantry JWT_SECRET=... cargo run -p pantry-api
//! ```

use anyhow::Context;
use pantry_api::{
    app::{build_router, AppState},
    config::Config,
};
use pantry_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pantry_api=debug,pantry_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Pantry API Server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    tracing::info!(environment = %config.environment, "Configuration loaded");

    let pool = create_pool(
        DatabaseConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to connect to the database")?;

    run_migrations(&pool)
        .await
        .context("Failed to apply database migrations")?;

    let address = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Pantry API Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
