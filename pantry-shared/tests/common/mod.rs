//! Shared helpers for the database integration tests
//!
//! Tests call [`test_pool`] first and return early when it yields None, so
//! the suite passes on machines without PostgreSQL. Set `DATABASE_URL` (or
//! put it in `.env`) to run them for real.

#![allow(dead_code)]

use pantry_shared::db::migrations::run_migrations;
use pantry_shared::db::pool::{create_pool, DatabaseConfig};
use pantry_shared::inputs::SignupInput;
use pantry_shared::models::user::{User, ValidRole};
use pantry_shared::services::UsersService;
use sqlx::PgPool;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "Secret123";

/// Connects and migrates, or None when no database is configured
pub async fn test_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();

    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = create_pool(DatabaseConfig::new(url).with_max_connections(5))
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// A unique signup so parallel tests never collide on email
pub fn signup(name: &str) -> SignupInput {
    SignupInput {
        email: format!("{}-{}@test.pantry.dev", name.to_lowercase(), Uuid::new_v4()),
        full_name: format!("{} {}", name, Uuid::new_v4().simple()),
        password: TEST_PASSWORD.to_string(),
    }
}

/// Creates a user with the given roles
pub async fn create_user(pool: &PgPool, name: &str, roles: &[ValidRole]) -> User {
    UsersService::new(pool.clone())
        .create_with_roles(signup(name), roles.to_vec())
        .await
        .expect("Failed to create test user")
}
