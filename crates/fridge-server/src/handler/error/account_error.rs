//! Conversions from account service outcomes into HTTP errors.

use fridge_store::StoreError;

use crate::handler::{Error, ErrorKind};
use crate::service::{AdminError, AuthError, HashError, TokenError};

/// Message shared by every refused sign-in so the response carries no hint about
/// which check failed.
const SIGN_IN_REFUSED: &str = "Invalid username or password";

impl From<AuthError> for Error<'static> {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ErrorKind::Unauthorized
                .with_message(SIGN_IN_REFUSED)
                .with_context("invalid credentials"),
            AuthError::AccountBlocked => ErrorKind::Unauthorized
                .with_message(SIGN_IN_REFUSED)
                .with_context("account is blocked"),
            AuthError::Conflict(fields) => ErrorKind::UnprocessableEntity
                .with_message("Account conflicts with an existing account")
                .with_resource("account")
                .with_fields(&fields),
            AuthError::Store(error) => error.into(),
            AuthError::Hasher(error) => error.into(),
            AuthError::Token(error) => error.into(),
        }
    }
}

impl From<AdminError> for Error<'static> {
    fn from(error: AdminError) -> Self {
        match error {
            AdminError::NotFound => ErrorKind::NotFound
                .with_message("Account not found")
                .with_resource("account"),
            AdminError::Conflict(fields) => ErrorKind::UnprocessableEntity
                .with_message("Update conflicts with an existing account")
                .with_resource("account")
                .with_fields(&fields),
            AdminError::Store(error) => error.into(),
            AdminError::Hasher(error) => error.into(),
        }
    }
}

impl From<TokenError> for Error<'static> {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Invalid(_) => ErrorKind::Unauthorized
                .with_message("Invalid auth token")
                .with_context(error.to_string()),
            TokenError::Expired { .. } => ErrorKind::Unauthorized
                .with_message("Auth token has expired")
                .with_context(error.to_string()),
            TokenError::Signing(_) | TokenError::OutOfRange(_) => {
                ErrorKind::InternalServerError.with_context(error.to_string())
            }
        }
    }
}

impl From<StoreError> for Error<'static> {
    fn from(error: StoreError) -> Self {
        if error.is_unique_violation() {
            return ErrorKind::UnprocessableEntity
                .with_resource("account")
                .with_field("username", "Username is already taken")
                .with_context(error.to_string());
        }

        ErrorKind::InternalServerError.with_context(format!("credential store: {error}"))
    }
}

impl From<HashError> for Error<'static> {
    fn from(error: HashError) -> Self {
        ErrorKind::InternalServerError.with_context(format!("password hasher: {error}"))
    }
}
