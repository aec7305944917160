/// Integration tests for the user directory and the auth service
///
/// Require PostgreSQL; see `common::test_pool`.

mod common;

use chrono::Duration;
use pantry_shared::auth::jwt::validate_token;
use pantry_shared::error::ServiceError;
use pantry_shared::inputs::{LoginInput, PaginationArgs, UpdateUserInput};
use pantry_shared::models::user::ValidRole;
use pantry_shared::services::{AuthService, UsersService};

const SECRET: &str = "integration-test-secret-with-32-chars!!";

fn auth(pool: &sqlx::PgPool) -> AuthService {
    AuthService::new(UsersService::new(pool.clone()), SECRET, Duration::hours(1))
}

#[tokio::test]
async fn test_signup_then_login_round_trip() {
    let Some(pool) = common::test_pool().await else { return };
    let auth = auth(&pool);
    let input = common::signup("Rosa");
    let email = input.email.clone();

    let signed_up = auth.signup(input).await.unwrap();
    assert_eq!(signed_up.user.roles, vec![ValidRole::User]);
    assert_ne!(signed_up.user.password_hash, common::TEST_PASSWORD);

    let logged_in = auth
        .login(LoginInput {
            email: email.to_uppercase(),
            password: common::TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();

    let claims = validate_token(&logged_in.token, SECRET).unwrap();
    assert_eq!(claims.sub, signed_up.user.id);

    let resolved = auth.authenticate(&logged_in.token).await.unwrap();
    assert_eq!(resolved.id, signed_up.user.id);

    let json = serde_json::to_value(&logged_in).unwrap();
    assert!(json["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_bad_credentials_share_one_message() {
    let Some(pool) = common::test_pool().await else { return };
    let auth = auth(&pool);
    let user = common::create_user(&pool, "Mateo", &[ValidRole::User]).await;

    let wrong_password = auth
        .login(LoginInput {
            email: user.email.clone(),
            password: "not-the-password".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_email = auth
        .login(LoginInput {
            email: "nobody@test.pantry.dev".to_string(),
            password: common::TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap_err();

    match (wrong_password, unknown_email) {
        (ServiceError::Unauthorized(a), ServiceError::Unauthorized(b)) => assert_eq!(a, b),
        other => panic!("expected two Unauthorized errors, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let Some(pool) = common::test_pool().await else { return };
    let users = UsersService::new(pool.clone());
    let input = common::signup("Twin");
    let mut again = input.clone();
    again.email = again.email.to_uppercase();

    users.create(input).await.unwrap();
    let err = users.create(again).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_blocked_user_cannot_log_in() {
    let Some(pool) = common::test_pool().await else { return };
    let auth = auth(&pool);
    let users = UsersService::new(pool.clone());
    let admin = common::create_user(&pool, "Admin", &[ValidRole::Admin]).await;
    let user = common::create_user(&pool, "Blocked", &[ValidRole::User]).await;

    let token = auth.issue_token(user.id).unwrap();
    let blocked = users.block(user.id, &admin).await.unwrap();
    assert!(!blocked.is_active);
    assert_eq!(blocked.last_update_by, Some(admin.id));

    let err = auth
        .login(LoginInput {
            email: user.email.clone(),
            password: common::TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    // Outstanding tokens stop working as well
    assert!(matches!(
        auth.authenticate(&token).await,
        Err(ServiceError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_admin_update_records_updater_and_rehashes() {
    let Some(pool) = common::test_pool().await else { return };
    let auth = auth(&pool);
    let users = UsersService::new(pool.clone());
    let admin = common::create_user(&pool, "Admin", &[ValidRole::Admin]).await;
    let user = common::create_user(&pool, "Target", &[ValidRole::User]).await;

    let updated = users
        .update(
            UpdateUserInput {
                id: user.id,
                email: None,
                full_name: Some("Renamed Target".to_string()),
                password: Some("NewSecret456".to_string()),
                roles: Some(vec![ValidRole::User, ValidRole::SuperUser]),
                is_active: None,
            },
            &admin,
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Renamed Target");
    assert_eq!(updated.last_update_by, Some(admin.id));
    assert!(updated.has_any_role(&[ValidRole::SuperUser]));

    auth.login(LoginInput {
        email: user.email.clone(),
        password: "NewSecret456".to_string(),
    })
    .await
    .unwrap();

    let missing = users
        .block(uuid::Uuid::new_v4(), &admin)
        .await
        .unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_list_filters_by_roles_and_name() {
    let Some(pool) = common::test_pool().await else { return };
    let users = UsersService::new(pool.clone());
    let operator = common::create_user(&pool, "Operator", &[ValidRole::SuperUser]).await;
    let regular = common::create_user(&pool, "Regular", &[ValidRole::User]).await;

    // Full names carry a uuid, so this search matches exactly one user
    let needle = operator.full_name.to_uppercase();

    let found = users
        .list(&[], PaginationArgs::default(), Some(&needle))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, operator.id);

    let found = users
        .list(&[ValidRole::Admin], PaginationArgs::default(), Some(&needle))
        .await
        .unwrap();
    assert!(found.is_empty());

    let found = users
        .list(
            &[ValidRole::User, ValidRole::SuperUser],
            PaginationArgs::default(),
            Some(&regular.full_name),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, regular.id);

    let page = users.list(&[], PaginationArgs::new(1, 0), None).await.unwrap();
    assert_eq!(page.len(), 1);
}
