use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::handler::request::{PASSWORD_MAX_LENGTH, validate_username};
use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Default JWT issuer identifier.
    pub const JWT_ISSUER: &str = "fridge-auth";

    /// Default JWT audience identifier.
    pub const JWT_AUDIENCE: &str = "fridge-api";

    /// Default token lifetime in seconds (one hour).
    pub const TOKEN_TTL_SECS: u64 = 3600;

    /// Default Argon2 memory cost in KiB (19 MiB).
    pub const ARGON2_MEMORY_KIB: u32 = 19 * 1024;

    /// Default Argon2 iteration count.
    pub const ARGON2_ITERATIONS: u32 = 2;

    /// Default Argon2 degree of parallelism.
    pub const ARGON2_PARALLELISM: u32 = 1;

    pub fn jwt_issuer() -> String {
        JWT_ISSUER.to_owned()
    }

    pub fn jwt_audience() -> String {
        JWT_AUDIENCE.to_owned()
    }

    pub fn token_ttl_secs() -> u64 {
        TOKEN_TTL_SECS
    }

    pub fn argon2_memory_kib() -> u32 {
        ARGON2_MEMORY_KIB
    }

    pub fn argon2_iterations() -> u32 {
        ARGON2_ITERATIONS
    }

    pub fn argon2_parallelism() -> u32 {
        ARGON2_PARALLELISM
    }
}

/// Minimum accepted length of the token signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (30 days).
const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// App [`state`] configuration.
///
/// Loaded once at startup and immutable thereafter.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Shared secret used to sign and verify tokens (HS256, at least 32 bytes).
    #[cfg_attr(
        feature = "config",
        arg(long, env = "JWT_SECRET", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    pub jwt_secret: String,

    /// Issuer identifier embedded in and required of every token.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "JWT_ISSUER", default_value = defaults::JWT_ISSUER)
    )]
    #[serde(default = "defaults::jwt_issuer")]
    pub jwt_issuer: String,

    /// Audience identifier embedded in and required of every token.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "JWT_AUDIENCE", default_value = defaults::JWT_AUDIENCE)
    )]
    #[serde(default = "defaults::jwt_audience")]
    pub jwt_audience: String,

    /// Token lifetime in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "TOKEN_TTL_SECS", default_value_t = defaults::TOKEN_TTL_SECS)
    )]
    #[serde(default = "defaults::token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Argon2id memory cost in KiB.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ARGON2_MEMORY_KIB", default_value_t = defaults::ARGON2_MEMORY_KIB)
    )]
    #[serde(default = "defaults::argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2id iteration count.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ARGON2_ITERATIONS", default_value_t = defaults::ARGON2_ITERATIONS)
    )]
    #[serde(default = "defaults::argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2id degree of parallelism.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ARGON2_PARALLELISM", default_value_t = defaults::ARGON2_PARALLELISM)
    )]
    #[serde(default = "defaults::argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Username of the administrator account created or promoted at startup.
    #[cfg_attr(feature = "config", arg(long, env = "ADMIN_USERNAME"))]
    #[serde(default)]
    pub admin_username: Option<String>,

    /// Password of the administrator account created at startup.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    pub admin_password: Option<String>,
}

impl ServiceConfig {
    /// Creates a configuration with the given signing secret and default settings.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_issuer: defaults::jwt_issuer(),
            jwt_audience: defaults::jwt_audience(),
            token_ttl_secs: defaults::TOKEN_TTL_SECS,
            argon2_memory_kib: defaults::ARGON2_MEMORY_KIB,
            argon2_iterations: defaults::ARGON2_ITERATIONS,
            argon2_parallelism: defaults::ARGON2_PARALLELISM,
            admin_username: None,
            admin_password: None,
        }
    }

    /// Sets the token lifetime in seconds.
    pub fn with_token_ttl_secs(mut self, secs: u64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    /// Sets the Argon2id work factor.
    pub fn with_argon2_params(mut self, memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        self.argon2_memory_kib = memory_kib;
        self.argon2_iterations = iterations;
        self.argon2_parallelism = parallelism;
        self
    }

    /// Sets the administrator credentials bootstrapped at startup.
    pub fn with_admin(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin_username = Some(username.into());
        self.admin_password = Some(password.into());
        self
    }

    /// Returns the token lifetime.
    pub fn token_ttl(&self) -> SignedDuration {
        // Bounded by `validate`, so the cast cannot wrap for accepted configs.
        SignedDuration::from_secs(self.token_ttl_secs.min(MAX_TOKEN_TTL_SECS) as i64)
    }

    /// Returns the Argon2id parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the parameters are out of range.
    pub fn argon2_params(&self) -> Result<argon2::Params> {
        argon2::Params::new(
            self.argon2_memory_kib,
            self.argon2_iterations,
            self.argon2_parallelism,
            None,
        )
        .map_err(|e| Error::config(format!("invalid Argon2 parameters: {e}")))
    }

    /// Returns the administrator credentials if both are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - the signing secret is shorter than [`MIN_JWT_SECRET_LEN`] bytes
    /// - the issuer or audience is empty
    /// - the token lifetime is zero or longer than 30 days
    /// - the Argon2 parameters are out of range
    /// - only one of the administrator username and password is set
    /// - the administrator credentials could not be used to sign in
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(Error::config(format!(
                "JWT secret must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }

        if self.jwt_issuer.trim().is_empty() {
            return Err(Error::config("JWT issuer cannot be empty"));
        }

        if self.jwt_audience.trim().is_empty() {
            return Err(Error::config("JWT audience cannot be empty"));
        }

        if self.token_ttl_secs == 0 || self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(Error::config(format!(
                "Token TTL must be between 1 and {MAX_TOKEN_TTL_SECS} seconds"
            )));
        }

        self.argon2_params()?;

        match (&self.admin_username, &self.admin_password) {
            (Some(_), None) | (None, Some(_)) => Err(Error::config(
                "Administrator username and password must be configured together",
            )),
            (Some(username), Some(password)) => {
                validate_username(username).map_err(|e| {
                    let reason = e.message.unwrap_or(e.code);
                    Error::config(format!("Invalid administrator username: {reason}"))
                })?;

                let length = password.chars().count();
                if !(1..=PASSWORD_MAX_LENGTH).contains(&length) {
                    return Err(Error::config(format!(
                        "Administrator password must be between 1 and {PASSWORD_MAX_LENGTH} characters long"
                    )));
                }

                Ok(())
            }
            (None, None) => Ok(()),
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn defaults_are_valid() -> anyhow::Result<()> {
        let config = ServiceConfig::new(SECRET);
        config.validate()?;
        assert_eq!(config.jwt_issuer, "fridge-auth");
        assert_eq!(config.jwt_audience, "fridge-api");
        assert_eq!(config.token_ttl(), SignedDuration::from_secs(3600));
        Ok(())
    }

    #[test]
    fn short_secret_is_rejected() {
        let error = ServiceConfig::new("too-short").validate().err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Config));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_ttl = ServiceConfig::new(SECRET).with_token_ttl_secs(0);
        assert!(zero_ttl.validate().is_err());

        let bad_argon = ServiceConfig::new(SECRET).with_argon2_params(1, 0, 0);
        assert!(bad_argon.validate().is_err());

        let mut half_admin = ServiceConfig::new(SECRET);
        half_admin.admin_username = Some("root".into());
        assert!(half_admin.validate().is_err());
        assert!(half_admin.admin_credentials().is_none());
    }

    #[test]
    fn admin_credentials_follow_account_rules() {
        let rejected = [
            ("fridge admin", "hunter2"),
            ("x", "hunter2"),
            ("", "hunter2"),
            ("root", ""),
        ];
        for (username, password) in rejected {
            let error = ServiceConfig::new(SECRET)
                .with_admin(username, password)
                .validate()
                .err();
            assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Config), "{username:?}");
        }

        let long_password = "p".repeat(PASSWORD_MAX_LENGTH + 1);
        let config = ServiceConfig::new(SECRET).with_admin("root", long_password);
        assert!(config.validate().is_err());

        let max_password = "p".repeat(PASSWORD_MAX_LENGTH);
        let config = ServiceConfig::new(SECRET).with_admin("u1", max_password);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ServiceConfig::new(SECRET).with_admin("root", "hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains(SECRET));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("root"));
    }

    #[test]
    fn serialization_skips_secrets() -> anyhow::Result<()> {
        let config = ServiceConfig::new(SECRET).with_admin("root", "hunter2");
        let json = serde_json::to_string(&config)?;
        assert!(!json.contains(SECRET));
        assert!(!json.contains("hunter2"));
        Ok(())
    }
}
