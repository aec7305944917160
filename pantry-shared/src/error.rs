/// Service error taxonomy
///
/// Every service in this crate returns [`ServiceError`]. Store failures are
/// classified at the service boundary: a uniqueness violation becomes
/// `Conflict`, a missing row becomes `NotFound`, and anything else is logged
/// and surfaced as an opaque `InternalError`.
///
/// # Example
///
/// ```
/// use pantry_shared::error::ServiceError;
///
/// let err = ServiceError::from(sqlx::Error::RowNotFound);
/// assert!(matches!(err, ServiceError::NotFound(_)));
/// assert_eq!(err.code(), "not_found");
/// ```

use crate::auth::{jwt::JwtError, password::PasswordError};

/// Result alias used by every service
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Typed failure of a service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Entity is missing, or exists but belongs to another owner
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation in the store
    #[error("{0}")]
    Conflict(String),

    /// Invalid credentials, invalid/expired token or inactive user
    #[error("{0}")]
    Unauthorized(String),

    /// Caller lacks a role, or the operation is disabled in this environment
    #[error("{0}")]
    Forbidden(String),

    /// Unclassified failure; the message is safe to show to callers
    #[error("{0}")]
    InternalError(String),
}

impl ServiceError {
    /// Shorthand for the ownership-scoped "not found" message
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} with id: {} not found", kind, id))
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Unauthorized(_) => "unauthorized",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::InternalError(_) => "internal_error",
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ServiceError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let detail = match db_err.constraint() {
                    Some(c) if c.contains("email") => "Email already exists".to_string(),
                    Some(c) => format!("Duplicate value violates {}", c),
                    None => "Duplicate value".to_string(),
                };
                ServiceError::Conflict(detail)
            }
            other => {
                tracing::error!(error = %other, "Unclassified database error");
                ServiceError::InternalError("Please check server logs".to_string())
            }
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "Password operation failed");
        ServiceError::InternalError("Please check server logs".to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => {
                tracing::error!(error = %msg, "Token signing failed");
                ServiceError::InternalError("Please check server logs".to_string())
            }
            JwtError::Expired => ServiceError::Unauthorized("Token expired".to_string()),
            _ => ServiceError::Unauthorized("Invalid token".to_string()),
        }
    }
}
