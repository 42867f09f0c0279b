//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings carrying the algorithm, parameters and salt, so a stored
//! hash stays verifiable after the configured work factor changes.

use std::fmt;
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::Result;
use crate::service::ServiceConfig;
use crate::utility::tracing_targets::TRACING_TARGET_PASSWORD_HASHER;

/// Failures of the password hasher.
///
/// A wrong password is not an error: [`PasswordHasher::verify_password`] reports
/// it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Hashing a password failed.
    #[error("password hashing failed: {0}")]
    Hash(ArgonError),
    /// A stored hash could not be parsed or verified.
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(ArgonError),
}

/// Argon2id password hashing and verification service.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Creates a hasher with the given Argon2id parameters.
    ///
    /// A hash of a random password is computed up front and used by
    /// [`verify_dummy_password`](Self::verify_dummy_password).
    pub fn new(params: Params) -> Result<Self, HashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();

        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(dummy_password.as_bytes(), &salt)
            .map_err(HashError::Hash)?
            .to_string();

        Ok(Self {
            argon2,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Creates a hasher from the work factor in the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let hasher = Self::new(config.argon2_params()?)?;
        tracing::debug!(
            target: TRACING_TARGET_PASSWORD_HASHER,
            memory_kib = config.argon2_memory_kib,
            iterations = config.argon2_iterations,
            parallelism = config.argon2_parallelism,
            "password hasher initialized"
        );

        Ok(hasher)
    }

    /// Hashes a password with a fresh random salt, returning a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password hashing operation failed"
                );

                HashError::Hash(e)
            })?;

        Ok(hash.to_string())
    }

    /// Verifies a password against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch. A stored hash that cannot be parsed is an
    /// error, never a mismatch.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, HashError> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_PASSWORD_HASHER,
                error = %e,
                "stored password hash has invalid format"
            );

            HashError::MalformedHash(e)
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    "password verification failed"
                );

                Ok(false)
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password verification system error"
                );

                Err(HashError::MalformedHash(e))
            }
        }
    }

    /// Performs a verification that always fails, taking as long as a real one.
    ///
    /// Used when the username is unknown so that response latency does not reveal
    /// which accounts exist.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.dummy_hash);
        false
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.argon2.params();
        f.debug_struct("PasswordHasher")
            .field("algorithm", &Algorithm::Argon2id)
            .field("memory_kib", &params.m_cost())
            .field("iterations", &params.t_cost())
            .field("parallelism", &params.p_cost())
            .finish_non_exhaustive()
    }
}
