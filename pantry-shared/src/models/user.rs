/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE valid_role AS ENUM ('admin', 'user', 'super_user');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     full_name VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     roles valid_role[] NOT NULL DEFAULT ARRAY['user']::valid_role[],
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     last_update_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use pantry_shared::models::user::{User, CreateUser, ValidRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     full_name: "Jane Doe".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     roles: vec![ValidRole::User],
/// }).await?;
///
/// let admins = User::list(&pool, &[ValidRole::Admin], None, 10, 0).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgHasArrayType, PgTypeInfo};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::substring_pattern;

const USER_COLUMNS: &str = "id, email, full_name, password_hash, roles, is_active, \
                            last_update_by, created_at, updated_at";

/// Roles a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "valid_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ValidRole {
    /// Can list, inspect, update and block other users
    Admin,

    /// Regular account; manages its own lists and items
    User,

    /// Reserved for operators
    SuperUser,
}

impl ValidRole {
    /// Role as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidRole::Admin => "admin",
            ValidRole::User => "user",
            ValidRole::SuperUser => "super_user",
        }
    }
}

impl PgHasArrayType for ValidRole {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_valid_role")
    }
}

/// A user account
///
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address, unique and case-insensitive (CITEXT)
    pub email: String,

    /// Display name, searchable
    pub full_name: String,

    /// Argon2id PHC string
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Non-empty set of roles
    pub roles: Vec<ValidRole>,

    /// False once an admin blocks the account
    pub is_active: bool,

    /// Admin who last changed this record
    pub last_update_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub roles: Vec<ValidRole>,
}

/// Partial update; only `Some` fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub roles: Option<Vec<ValidRole>>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.full_name.is_none()
            && self.password_hash.is_none()
            && self.roles.is_none()
            && self.is_active.is_none()
    }
}

impl User {
    /// Checks whether the user holds any of `roles`
    pub fn has_any_role(&self, roles: &[ValidRole]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_email_key` if the email exists
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, full_name, password_hash, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.email)
        .bind(data.full_name)
        .bind(data.password_hash)
        .bind(data.roles)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1::citext"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Lists users in one composed query
    ///
    /// - `roles` empty: every user; otherwise users whose roles intersect it
    /// - `search`: case-insensitive substring of `full_name`
    ///
    /// No ORDER BY is applied; callers get store-default order.
    pub async fn list(
        pool: &PgPool,
        roles: &[ValidRole],
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));

        if !roles.is_empty() {
            query.push(" AND roles && ").push_bind(roles.to_vec());
        }
        if let Some(search) = search {
            query
                .push(" AND LOWER(full_name) LIKE ")
                .push_bind(substring_pattern(search));
        }
        query
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        query.build_query_as::<User>().fetch_all(pool).await
    }

    /// Applies a partial update and stamps `last_update_by`
    ///
    /// Returns None if the user doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
        updated_by: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE users SET updated_at = NOW(), last_update_by = ");
        query.push_bind(updated_by);

        if let Some(email) = data.email {
            query.push(", email = ").push_bind(email);
        }
        if let Some(full_name) = data.full_name {
            query.push(", full_name = ").push_bind(full_name);
        }
        if let Some(password_hash) = data.password_hash {
            query.push(", password_hash = ").push_bind(password_hash);
        }
        if let Some(roles) = data.roles {
            query.push(", roles = ").push_bind(roles);
        }
        if let Some(is_active) = data.is_active {
            query.push(", is_active = ").push_bind(is_active);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {USER_COLUMNS}"));

        query.build_query_as::<User>().fetch_optional(pool).await
    }

    /// Counts all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes every user. Lists and items must already be gone.
    pub async fn delete_all<'e, E: PgExecutor<'e>>(executor: E) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(executor).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            full_name: "Test User".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            roles: vec![ValidRole::User],
            is_active: true,
            last_update_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2id"));
        assert_eq!(json["fullName"], "Test User");
        assert_eq!(json["roles"][0], "user");
    }

    #[test]
    fn test_has_any_role() {
        let user = sample_user();
        assert!(user.has_any_role(&[ValidRole::User, ValidRole::Admin]));
        assert!(!user.has_any_role(&[ValidRole::Admin]));
        assert!(!user.has_any_role(&[]));
    }

    #[test]
    fn test_role_names() {
        assert_eq!(ValidRole::Admin.as_str(), "admin");
        assert_eq!(ValidRole::SuperUser.as_str(), "super_user");
        let role: ValidRole = serde_json::from_str("\"super_user\"").unwrap();
        assert_eq!(role, ValidRole::SuperUser);
    }

    #[test]
    fn test_update_user_default_is_empty() {
        assert!(UpdateUser::default().is_empty());
        assert!(!UpdateUser {
            is_active: Some(false),
            ..Default::default()
        }
        .is_empty());
    }
}
