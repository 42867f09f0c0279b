//! Typed outcomes of the account services.

use std::borrow::Cow;
use std::collections::BTreeMap;

use fridge_store::StoreError;

use crate::service::{HashError, TokenError};

/// Field-level messages explaining why a request conflicts with stored state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Cow<'static, str>, Vec<Cow<'static, str>>>);

impl FieldErrors {
    /// Creates an empty set of field errors.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for the given field.
    pub fn with(
        mut self,
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.0.entry(field.into()).or_default().push(message.into());
        self
    }

    /// Returns whether no field has an error.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for a field.
    pub fn get(&self, field: &str) -> Option<&[Cow<'static, str>]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterates over fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Cow<'static, str>])> {
        self.0.iter().map(|(field, messages)| (field.as_ref(), messages.as_slice()))
    }

    /// Field error for a username held by another account.
    pub(crate) fn username_taken() -> Self {
        Self::new().with("username", "Username is already taken")
    }
}

/// Failures of sign-in, registration and the administrator bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,
    /// The credentials are correct but the account is blocked.
    #[error("account is blocked")]
    AccountBlocked,
    /// Registration collides with an existing account.
    #[error("account conflicts with an existing account")]
    Conflict(FieldErrors),
    /// The credential store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Hashing or verifying a password failed.
    #[error(transparent)]
    Hasher(#[from] HashError),
    /// Signing a token failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthError {
    /// Returns whether the error is a sign-in refusal rather than a fault.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::AccountBlocked)
    }
}

/// Failures of the user administration operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// No account has the given identifier.
    #[error("account not found")]
    NotFound,
    /// The update would break a domain rule such as username uniqueness.
    #[error("update conflicts with existing accounts")]
    Conflict(FieldErrors),
    /// The credential store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Hashing a new password failed.
    #[error(transparent)]
    Hasher(#[from] HashError),
}
