//! Account services: sign-in and user administration.

mod administration;
mod authentication;
mod error;

pub use administration::{ProfileUpdate, UserService};
pub use authentication::AuthService;
pub use error::{AdminError, AuthError, FieldErrors};
