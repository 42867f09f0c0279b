//! HTTP request extractors with uniform error responses.
//!
//! - [`AuthState`] - verified claims of the caller
//! - [`Json`] - JSON body with descriptive rejections
//! - [`ValidateJson`] - JSON body checked with `validator`
//! - [`Path`] - path parameters with descriptive rejections

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{
    AccessDenied, AuthClaims, AuthState, RoleRequirement, authorize,
};
pub use crate::extract::reject::{Json, Path, ValidateJson};
