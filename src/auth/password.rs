//! Password hashing and verification using Argon2id

use crate::{config::SecurityConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with configurable parameters
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with default parameters (OWASP recommended)
    pub fn new() -> Self {
        // m=64MiB, t=3 iterations, p=4 lanes
        Self::with_params(65536, 3, 4)
    }

    /// Create hasher with explicit cost parameters.
    /// Out-of-range parameters fall back to the argon2 crate defaults.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        let params = Params::new(memory_kib, iterations, parallelism, None).unwrap_or_else(|e| {
            tracing::warn!("Invalid Argon2 params ({}), using defaults", e);
            Params::default()
        });

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::with_params(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
        )
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a candidate password against a stored hash.
    /// A hash that cannot be parsed never verifies.
    pub fn verify(&self, hash: &str, candidate: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Failed to parse password hash: {:?}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Hash on the blocking pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Verify on the blocking pool
    pub async fn verify_blocking(&self, hash: String, candidate: String) -> Result<bool, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &candidate))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "secret1"));
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret1").unwrap();
        assert!(!hasher.verify(&hash, "secret2"));
    }

    #[test]
    fn test_hash_is_different_each_time() {
        let hasher = fast_hasher();

        let hash1 = hasher.hash("secret1").unwrap();
        let hash2 = hasher.hash("secret1").unwrap();

        // Hashes should be different due to salt
        assert_ne!(hash1, hash2);
        assert!(hasher.verify(&hash1, "secret1"));
        assert!(hasher.verify(&hash2, "secret1"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = fast_hasher();
        assert!(!hasher.verify("not-a-phc-string", "secret1"));
        assert!(!hasher.verify("", ""));
    }

    #[test]
    fn test_invalid_params_fall_back() {
        let hasher = PasswordHasher::with_params(0, 0, 0);
        let hash = hasher.hash("secret1").unwrap();
        assert!(hasher.verify(&hash, "secret1"));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hasher = fast_hasher();
        let hash = hasher.hash_blocking("secret1".to_string()).await.unwrap();
        assert!(hasher
            .verify_blocking(hash.clone(), "secret1".to_string())
            .await
            .unwrap());
        assert!(!hasher.verify_blocking(hash, "nope".to_string()).await.unwrap());
    }
}
