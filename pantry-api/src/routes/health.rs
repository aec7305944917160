/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "environment": "dev",
///   "database": "connected",
///   "pool": { "size": 2, "idle": 1, "in_use": 1 }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use pantry_shared::db::pool::{health_check as database_health, pool_stats, PoolStats};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,

    /// "connected" or "disconnected"
    pub database: &'static str,
    pub pool: PoolStats,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = database_health(&state.db).await.is_ok();

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.as_str(),
        database: if connected { "connected" } else { "disconnected" },
        pool: pool_stats(&state.db),
    }))
}
