//! Password hashing and verification using Argon2
//!
//! Uses the argon2id variant. The time cost is configurable; memory and
//! parallelism stay at the crate defaults.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::types::ApiError;

/// Password hasher with a configurable time cost.
#[derive(Debug, Clone)]
pub struct Hasher {
    time_cost: u32,
}

impl Hasher {
    pub fn new(time_cost: u32) -> Self {
        Self { time_cost }
    }

    fn argon2(&self) -> Result<Argon2<'static>, ApiError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            self.time_cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| ApiError::Config(format!("Invalid hash parameters: {e}")))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password
    ///
    /// Returns the PHC-formatted hash string that includes the salt and
    /// parameters.
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))
    }

    /// Verify a password against a stored hash
    ///
    /// Returns true if the password matches the hash. The parameters
    /// recorded in the PHC string take precedence over the configured ones,
    /// so hashes written under an older cost still verify.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {e}")))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
