/// User directory
///
/// Creation, lookup, role-filtered listing and admin updates. Users are never
/// deleted; [`UsersService::block`] is the soft disable.

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::error::{ServiceError, ServiceResult};
use crate::inputs::{PaginationArgs, SignupInput, UpdateUserInput};
use crate::models::user::{CreateUser, UpdateUser, User, ValidRole};

#[derive(Debug, Clone)]
pub struct UsersService {
    pool: PgPool,
}

impl UsersService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a user with the default `user` role
    pub async fn create(&self, input: SignupInput) -> ServiceResult<User> {
        self.create_with_roles(input, vec![ValidRole::User]).await
    }

    /// Registers a user with explicit roles
    ///
    /// # Errors
    ///
    /// `Conflict` if the email is taken (case-insensitive).
    pub async fn create_with_roles(
        &self,
        input: SignupInput,
        roles: Vec<ValidRole>,
    ) -> ServiceResult<User> {
        let password_hash = hash_password(&input.password)?;

        let user = User::create(
            &self.pool,
            CreateUser {
                email: input.email,
                full_name: input.full_name,
                password_hash,
                roles,
            },
        )
        .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> ServiceResult<User> {
        User::find_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} not found", email)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> ServiceResult<User> {
        User::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Lists users whose roles intersect `roles` (all users when empty)
    pub async fn list(
        &self,
        roles: &[ValidRole],
        pagination: PaginationArgs,
        search: Option<&str>,
    ) -> ServiceResult<Vec<User>> {
        debug!(
            roles = ?roles,
            limit = pagination.limit,
            offset = pagination.offset,
            search = search.unwrap_or_default(),
            "Listing users"
        );

        let users = User::list(
            &self.pool,
            roles,
            search,
            pagination.limit,
            pagination.offset,
        )
        .await?;

        Ok(users)
    }

    /// Admin update. A new password is hashed before it is stored.
    pub async fn update(&self, input: UpdateUserInput, acting: &User) -> ServiceResult<User> {
        let password_hash = match input.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let patch = UpdateUser {
            email: input.email,
            full_name: input.full_name,
            password_hash,
            roles: input.roles,
            is_active: input.is_active,
        };

        let user = User::update(&self.pool, input.id, patch, Some(acting.id))
            .await?
            .ok_or_else(|| ServiceError::not_found("User", input.id))?;

        info!(user_id = %user.id, updated_by = %acting.id, "User updated");
        Ok(user)
    }

    /// Deactivates a user; the row is kept
    pub async fn block(&self, id: Uuid, acting: &User) -> ServiceResult<User> {
        let patch = UpdateUser {
            is_active: Some(false),
            ..Default::default()
        };

        let user = User::update(&self.pool, id, patch, Some(acting.id))
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        info!(user_id = %user.id, blocked_by = %acting.id, "User blocked");
        Ok(user)
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        Ok(User::count(&self.pool).await?)
    }
}
