/// Role checks
///
/// Pantry has two authorization layers:
///
/// 1. **Ownership**: lists, items and list items are only visible to their
///    owner. This is enforced inside the queries themselves (see
///    [`crate::services::owned`]) and surfaces as `NotFound`.
/// 2. **Roles**: user administration requires `admin`. Checked here and
///    surfaces as `Forbidden`.
///
/// # Example
///
/// ```no_run
/// use pantry_shared::auth::authorization::require_roles;
/// use pantry_shared::models::user::{User, ValidRole};
///
/// # fn example(user: &User) -> Result<(), pantry_shared::error::ServiceError> {
/// require_roles(user, &[ValidRole::Admin])?;
/// # Ok(())
/// # }
/// ```

use crate::error::ServiceError;
use crate::models::user::{User, ValidRole};

/// Checks that `user` holds at least one of `required`
///
/// An empty `required` slice only requires an authenticated user.
///
/// # Errors
///
/// Returns `ServiceError::Forbidden` naming the missing roles
pub fn require_roles(user: &User, required: &[ValidRole]) -> Result<(), ServiceError> {
    if required.is_empty() || user.has_any_role(required) {
        return Ok(());
    }

    let names: Vec<&str> = required.iter().map(ValidRole::as_str).collect();
    tracing::debug!(user_id = %user.id, required = ?names, "Role check failed");

    Err(ServiceError::Forbidden(format!(
        "User {} needs a valid role: [{}]",
        user.full_name,
        names.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with(roles: Vec<ValidRole>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            full_name: "Some One".to_string(),
            password_hash: "hash".to_string(),
            roles,
            is_active: true,
            last_update_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_requirement_passes() {
        assert!(require_roles(&user_with(vec![ValidRole::User]), &[]).is_ok());
    }

    #[test]
    fn test_admin_passes_admin_check() {
        let admin = user_with(vec![ValidRole::User, ValidRole::Admin]);
        assert!(require_roles(&admin, &[ValidRole::Admin]).is_ok());
    }

    #[test]
    fn test_plain_user_is_forbidden() {
        let user = user_with(vec![ValidRole::User]);
        let err = require_roles(&user, &[ValidRole::Admin, ValidRole::SuperUser]).unwrap_err();

        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(err.to_string().contains("admin, super_user"));
    }
}
