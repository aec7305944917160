/// PostgreSQL connection pool
///
/// Every service holds a clone of the same [`PgPool`]; cloning is cheap and
/// shares the underlying connections.
///
/// # Example
///
/// ```no_run
/// use pantry_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(DatabaseConfig::new("postgresql://localhost/pantry")).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pool tuning. Timeouts are in seconds so they map directly onto env vars.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    pub max_connections: u32,

    /// Connections kept warm while idle
    pub min_connections: u32,

    /// How long `acquire` waits for a free connection
    pub acquire_timeout_seconds: u64,

    /// None keeps idle connections open forever
    pub idle_timeout_seconds: Option<u64>,

    /// None disables connection recycling
    pub max_lifetime_seconds: Option<u64>,

    /// Ping connections before handing them out
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

impl DatabaseConfig {
    /// Default tuning for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the pool size; zero is raised to one
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        let max_connections = max_connections.max(1);
        self.max_connections = max_connections;
        self.min_connections = self.min_connections.min(max_connections);
        self
    }
}

/// Opens the pool and verifies the database answers
///
/// # Errors
///
/// Fails if the URL is invalid, the server is unreachable or the health
/// query does not return.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_seconds = config.acquire_timeout_seconds,
        "Creating database connection pool"
    );

    if config.max_connections == 0 {
        return Err(sqlx::Error::Configuration(
            "max_connections must be at least 1".into(),
        ));
    }

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .test_before_acquire(config.test_before_acquire);

    if let Some(idle) = config.idle_timeout_seconds {
        options = options.idle_timeout(Duration::from_secs(idle));
    }
    if let Some(lifetime) = config.max_lifetime_seconds {
        options = options.max_lifetime(Duration::from_secs(lifetime));
    }

    let pool = options.connect(&config.url).await?;
    health_check(&pool).await?;

    info!("Database connection pool ready");
    Ok(pool)
}

/// Runs `SELECT 1` against the pool
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (value,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if value != 1 {
        warn!(value, "Database health check returned an unexpected value");
        return Err(sqlx::Error::Protocol(
            "health check returned an unexpected value".into(),
        ));
    }

    debug!("Database health check passed");
    Ok(())
}

/// Snapshot of pool usage, reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
    pub in_use: usize,
}

pub fn pool_stats(pool: &PgPool) -> PoolStats {
    let size = pool.size();
    let idle = pool.num_idle();

    PoolStats {
        size,
        idle,
        in_use: (size as usize).saturating_sub(idle),
    }
}

/// Closes every connection; used on shutdown
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}
