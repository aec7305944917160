/// Integration tests for the pool and embedded migrations
///
/// Require PostgreSQL; see `common::test_pool`.

mod common;

use pantry_shared::db::migrations::{applied_count, run_migrations};
use pantry_shared::db::pool::{health_check, pool_stats};

#[tokio::test]
async fn test_health_check_and_stats() {
    let Some(pool) = common::test_pool().await else { return };

    health_check(&pool).await.expect("health check failed");

    let stats = pool_stats(&pool);
    assert!(stats.size >= 1);
    assert!(stats.in_use <= stats.size as usize);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(pool) = common::test_pool().await else { return };

    let before = applied_count(&pool).await.unwrap();
    run_migrations(&pool).await.expect("second run failed");
    let after = applied_count(&pool).await.unwrap();

    assert!(before >= 1);
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_schema_rejects_empty_roles() {
    let Some(pool) = common::test_pool().await else { return };

    let result = sqlx::query(
        "INSERT INTO users (email, full_name, password_hash, roles) \
         VALUES ('empty-roles@test.pantry.dev', 'Nobody', 'x', '{}')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "a user without roles was accepted");
}
