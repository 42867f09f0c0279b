//! Bearer token authentication and role-based authorization.

mod auth_state;
mod authorize;

pub use auth_state::AuthState;
pub use authorize::{AccessDenied, RoleRequirement, authorize};

pub use crate::service::AuthClaims;
