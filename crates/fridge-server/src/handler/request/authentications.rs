//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_username;

/// Request payload for sign-in.
///
/// Only presence is checked here; unknown or malformed credentials are
/// answered with the same rejection as a wrong password.
#[must_use]
#[derive(Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignIn {
    /// Username of the account.
    #[validate(length(min = 1))]
    pub username: String,

    /// Password of the account.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request payload for sign-up.
#[must_use]
#[derive(Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUp {
    /// Username of the new account.
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    /// Password of the new account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

// Passwords never reach the logs through `Debug`.
impl std::fmt::Debug for SignIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignIn")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SignUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUp")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
