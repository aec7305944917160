/// Signup, login and bearer-token resolution
///
/// Tokens are stateless HS256 JWTs whose subject is the user id. Every
/// request re-loads the user, so blocking takes effect immediately even for
/// tokens that have not expired.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::users::UsersService;
use crate::auth::jwt::{create_token, validate_token, Claims};
use crate::auth::password::verify_password;
use crate::error::{ServiceError, ServiceResult};
use crate::inputs::{LoginInput, SignupInput};
use crate::models::user::User;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Token plus the user it was issued for
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    users: UsersService,
    jwt_secret: Arc<str>,
    token_ttl: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(users: UsersService, jwt_secret: impl Into<Arc<str>>, token_ttl: Duration) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    pub async fn signup(&self, input: SignupInput) -> ServiceResult<AuthResponse> {
        let user = self.users.create(input).await?;
        self.respond(user)
    }

    /// # Errors
    ///
    /// `Unauthorized` for an unknown email, a wrong password or a blocked
    /// user. The first two share one message.
    pub async fn login(&self, input: LoginInput) -> ServiceResult<AuthResponse> {
        let user = match self.users.find_by_email(&input.email).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))
            }
            Err(e) => return Err(e),
        };

        if !verify_password(&input.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        ensure_active(&user)?;

        info!(user_id = %user.id, "User logged in");
        self.respond(user)
    }

    /// Issues a fresh token for an already authenticated user
    pub fn revalidate(&self, user: &User) -> ServiceResult<AuthResponse> {
        self.respond(user.clone())
    }

    /// Resolves a bearer token to an active user
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = validate_token(token, &self.jwt_secret)?;

        let user = match self.users.find_by_id(claims.sub).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                return Err(ServiceError::Unauthorized("Token user no longer exists".to_string()))
            }
            Err(e) => return Err(e),
        };
        ensure_active(&user)?;

        Ok(user)
    }

    /// Signs a token for `user_id`
    pub fn issue_token(&self, user_id: Uuid) -> ServiceResult<String> {
        let claims = Claims::new(user_id, self.token_ttl);
        Ok(create_token(&claims, &self.jwt_secret)?)
    }

    fn respond(&self, user: User) -> ServiceResult<AuthResponse> {
        let token = self.issue_token(user.id)?;
        Ok(AuthResponse { token, user })
    }
}

fn ensure_active(user: &User) -> ServiceResult<()> {
    if user.is_active {
        Ok(())
    } else {
        warn!(user_id = %user.id, "Inactive user rejected");
        Err(ServiceError::Unauthorized(
            "User is inactive, talk with an admin".to_string(),
        ))
    }
}
