/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use pantry_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = pantry_api::app::build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use pantry_shared::seed::SeedService;
use pantry_shared::services::{
    AuthService, ItemsService, ListItemsService, ListsService, UsersService,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler by Axum's `State` extractor. Services only
/// hold pool handles, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,

    pub auth: AuthService,
    pub users: UsersService,
    pub items: ItemsService,
    pub lists: ListsService,
    pub list_items: ListItemsService,
    pub seed: SeedService,
}

impl AppState {
    /// Constructs every service around one pool
    pub fn new(db: PgPool, config: Config) -> Self {
        let users = UsersService::new(db.clone());
        let auth = AuthService::new(users.clone(), config.jwt.secret.clone(), config.token_ttl());

        Self {
            auth,
            users,
            items: ItemsService::new(db.clone()),
            lists: ListsService::new(db.clone()),
            list_items: ListItemsService::new(db.clone()),
            seed: SeedService::new(db.clone(), config.environment),
            config: Arc::new(config),
            db,
        }
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── GET  /health          # liveness + database status (public)
/// └── POST /v1/operations   # operation gateway
/// ```
///
/// Layers, outermost first: CORS, request tracing, bearer token extraction
/// (gateway only).
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let v1_routes = Router::new()
        .route("/operations", post(routes::operations::handle_operation))
        .layer(axum::middleware::from_fn(
            crate::middleware::bearer::bearer_token_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
