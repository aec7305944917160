/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`authorization`]: role checks for administrative operations
///
/// # Example
///
/// ```no_run
/// use pantry_shared::auth::password::{hash_password, verify_password};
/// use pantry_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), Duration::hours(4));
/// let token = create_token(&claims, "secret-key")?;
/// let claims = validate_token(&token, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
