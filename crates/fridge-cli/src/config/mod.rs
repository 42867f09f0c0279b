//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig       # Host, port, shutdown
//! ├── recovery: RecoveryConfig   # Request timeout
//! ├── service: ServiceConfig     # Signing secret, token lifetime, Argon2, admin bootstrap
//! └── log_json                   # JSON log output
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//!
//! ```bash
//! fridge --jwt-secret "$(openssl rand -hex 32)" --port 8080
//!
//! JWT_SECRET=... ADMIN_USERNAME=root ADMIN_PASSWORD=... PORT=8080 fridge
//! ```

mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use fridge_server::middleware::RecoveryConfig;
use fridge_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "fridge")]
#[command(about = "FridgeManager identity and access control server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Panic and timeout recovery configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Token, hashing and administrator bootstrap configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, env = "LOG_JSON")]
    #[serde(default)]
    pub log_json: bool,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    ///
    /// Runs before clap so `env` defaults can come from the file.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// `RUST_LOG` overrides the default `info` level.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        if self.log_json {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;

        if self.recovery.request_timeout == 0 || self.recovery.request_timeout > 300 {
            anyhow::bail!(
                "Request timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.recovery.request_timeout
            );
        }

        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "starting fridge identity server"
        );

        Self::log_build_info();
        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            jwt_issuer = %self.service.jwt_issuer,
            jwt_audience = %self.service.jwt_audience,
            token_ttl_secs = self.service.token_ttl_secs,
            admin_bootstrap = self.service.admin_credentials().is_some(),
            "Service configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn parses_arguments() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "fridge",
            "--jwt-secret",
            SECRET,
            "--port",
            "8080",
            "--token-ttl-secs",
            "600",
            "--admin-username",
            "root",
            "--admin-password",
            "hunter2",
        ])?;

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.service.token_ttl_secs, 600);
        assert_eq!(cli.service.admin_credentials(), Some(("root", "hunter2")));
        cli.validate()?;
        Ok(())
    }

    #[test]
    fn rejects_short_secret() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["fridge", "--jwt-secret", "short"])?;
        assert!(cli.validate().is_err());
        Ok(())
    }

    #[test]
    fn rejects_zero_request_timeout() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "fridge",
            "--jwt-secret",
            SECRET,
            "--request-timeout",
            "0",
        ])?;
        assert!(cli.validate().is_err());
        Ok(())
    }
}
