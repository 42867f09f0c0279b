//! Middleware for `axum::Router` and HTTP request processing.
//!
//! ```rust,ignore
//! use fridge_server::middleware::{
//!     RecoveryConfig, RouterAuthExt, RouterObservabilityExt, RouterRecoveryExt,
//! };
//!
//! let app = users_router
//!     .with_required_roles(&state, RoleRequirement::admin())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod authorization;
mod observability;
mod recovery;

pub use authorization::{RouteGuard, RouterAuthExt, require_roles};
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};

pub use crate::extract::RoleRequirement;
