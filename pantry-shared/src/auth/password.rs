/// Password hashing using Argon2id
///
/// Hashes are salted with 16 random bytes and stored as PHC strings, so the
/// parameters travel with the hash and verification needs no configuration.
///
/// # Parameters
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 19 MiB (19456 KiB)
/// - **Iterations**: 2 passes
/// - **Parallelism**: 1 lane
///
/// # Example
///
/// ```
/// use pantry_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, ParamsBuilder, Version,
};

/// Memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 19_456;

/// Number of passes
pub const TIME_COST: u32 = 2;

/// Number of lanes
pub const PARALLELISM: u32 = 1;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a plaintext password
///
/// Two calls with the same password produce different hashes (fresh salt).
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored hash
///
/// Returns `Ok(false)` on mismatch. The comparison is constant-time.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if `hash` is not a PHC string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // A PHC string without an output would otherwise read as a plain mismatch
    if parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash("Hash has no output".to_string()));
    }

    // Parameters are read back from the PHC string
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let password = "plain_password";
        let hash = hash_password(password).expect("Hash should succeed");

        assert_ne!(hash, password);
        assert!(!hash.contains(password));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password").expect("Hash should succeed");
        assert!(verify_password("correct_password", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_rejects_altered_passwords() {
        let password = "Abc123456";
        let hash = hash_password(password).expect("Hash should succeed");

        for altered in ["abc123456", "Abc12345", "Abc1234567", " Abc123456", ""] {
            assert!(
                !verify_password(altered, &hash).expect("Verify should succeed"),
                "altered password {:?} must not verify",
                altered
            );
        }
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_hash_without_output_is_invalid() {
        let hash = hash_password("correct_password").expect("Hash should succeed");
        let truncated = &hash[..hash.rfind('$').expect("PHC separator")];

        assert!(matches!(
            verify_password("correct_password", truncated),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_unicode_roundtrip() {
        let password = "unicode-密码-パスワード";
        let hash = hash_password(password).expect("Hash should succeed");
        assert!(verify_password(password, &hash).expect("Verify should succeed"));
    }
}
