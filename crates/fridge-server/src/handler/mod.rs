//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use fridge_server::handler::routes;
//! use fridge_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::new("0123456789abcdef0123456789abcdef");
//! let state = ServiceState::from_config(&config).await?;
//!
//! let app: axum::Router = routes(state.clone()).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod error;
pub mod request;
pub mod response;
mod users;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub(crate) use crate::handler::response::ErrorResponse;
use crate::middleware::{RoleRequirement, RouterAuthExt};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes reachable without a token.
fn public_routes() -> Router<ServiceState> {
    Router::new().merge(authentication::public_routes())
}

/// Returns a [`Router`] with all routes requiring any verified token.
fn private_routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(authentication::private_routes())
        .with_authentication(state)
}

/// Returns a [`Router`] with all routes requiring the administrator role.
fn admin_routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(users::routes())
        .with_required_roles(state, RoleRequirement::admin())
}

/// Returns a [`Router`] with all routes.
///
/// Unmatched paths fall through to a JSON `404` regardless of credentials.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(admin_routes(&state))
        .merge(private_routes(&state))
        .merge(public_routes())
        .fallback(handler)
}
