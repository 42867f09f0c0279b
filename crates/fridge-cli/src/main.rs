#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! `fridge` binary: parses configuration, bootstraps the identity service and
//! serves its HTTP API until a shutdown signal arrives.

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use fridge_server::handler::routes;
use fridge_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
use fridge_server::service::{ServiceConfig, ServiceState};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "fridge_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "fridge_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "fridge_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    cli.init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service).await?;
    let router = create_router(state, &cli.recovery);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Routes (innermost) - authorization guards and handlers
fn create_router(state: ServiceState, recovery: &RecoveryConfig) -> Router {
    let api_routes: Router = routes(state.clone()).with_state(state);

    api_routes.with_observability().with_recovery(recovery)
}
