/// Configuration management for the API server
///
/// Loaded once at startup from environment variables (and `.env` when
/// present).
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma separated origins, or `*` (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: HS256 signing key, at least 32 characters (required)
/// - `JWT_EXPIRATION_HOURS`: Token lifetime, at most one year (default: 4)
/// - `APP_STATE`: `dev`, `test` or `prod` (default: dev)
/// - `RUST_LOG`: Log filter, read by the subscriber in `main`
///
/// # Example
///
/// ```no_run
/// use pantry_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use pantry_shared::seed::Environment;
use std::env;

/// Longest token lifetime accepted from `JWT_EXPIRATION_HOURS` (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,

    /// Deployment environment; the seed is refused in production
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Keep secret. Generate with `openssl rand -hex 32`.
    pub secret: String,

    pub expiration_hours: i64,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or a value doesn't parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var_or("API_PORT", "8080")
            .parse::<u16>()
            .context("API_PORT must be a port number")?;

        let cors_origins = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;
        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be a positive integer");
        }

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expiration_hours = var_or("JWT_EXPIRATION_HOURS", "4")
            .parse::<i64>()
            .context("JWT_EXPIRATION_HOURS must be an integer")?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&expiration_hours) {
            anyhow::bail!(
                "JWT_EXPIRATION_HOURS must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            );
        }

        let environment = var_or("APP_STATE", "dev").parse::<Environment>()?;

        Ok(Self {
            api: ApiConfig {
                host: var_or("API_HOST", "0.0.0.0"),
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                expiration_hours,
            },
            environment,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.expiration_hours)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
