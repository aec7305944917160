/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry only the user id as subject. They
/// are stateless: nothing is persisted and there is no revocation list, so a
/// token stays valid until `exp`. Blocking a user is enforced when the token
/// is resolved to a user, not here.
///
/// # Example
///
/// ```
/// use pantry_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let claims = Claims::new(user_id, Duration::hours(4));
/// let token = create_token(&claims, "pantry-doc-secret")?;
///
/// let validated = validate_token(&token, "pantry-doc-secret")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped on every token
pub const ISSUER: &str = "pantry";

/// Why a token could not be issued or accepted
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Signing failed
    #[error("token signing failed: {0}")]
    CreateError(String),

    /// Signature, issuer or structural validation failed
    #[error("token rejected: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("token expired")]
    Expired,

    /// Input is not a JWT at all
    #[error("malformed token: {0}")]
    InvalidFormat(String),
}

/// JWT claims
///
/// - `sub`: user id
/// - `iss`: always [`ISSUER`]
/// - `iat` / `nbf` / `exp`: Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `user_id` expiring after `expires_in`
    pub fn new(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// True once `exp` has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact JWT
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(format!("encode: {}", e)))
}

/// Validates a JWT and returns its claims
///
/// Checks signature, `exp`, `nbf` and issuer. No leeway is applied to
/// expiry.
///
/// # Errors
///
/// - `JwtError::Expired` when `exp` has passed
/// - `JwtError::InvalidFormat` for malformed input
/// - `JwtError::ValidationError` for any other failure
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    use jsonwebtoken::errors::ErrorKind;

    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            JwtError::InvalidFormat(e.to_string())
        }
        _ => JwtError::ValidationError(format!("{}", e)),
    })?;

    Ok(token_data.claims)
}
