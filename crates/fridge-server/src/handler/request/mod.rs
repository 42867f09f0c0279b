//! Request types for HTTP handlers.

mod accounts;
mod authentications;
mod paths;
mod validations;

pub use accounts::*;
pub use authentications::*;
pub use paths::*;
pub use validations::*;
