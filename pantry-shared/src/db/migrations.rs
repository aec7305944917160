/// Embedded schema migrations
///
/// The SQL files under the workspace `migrations/` directory are compiled
/// into the binary with [`sqlx::migrate!`] and applied at startup. Applied
/// versions are tracked in `_sqlx_migrations`, so running twice is a no-op.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::{error, info};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Applies every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Applying database migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema is up to date");
    Ok(())
}

/// Number of successfully applied migrations
pub async fn applied_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = TRUE")
        .fetch_one(pool)
        .await
}
