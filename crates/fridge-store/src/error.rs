//! Error types for credential store operations.

use std::borrow::Cow;

use crate::types::{AccountConstraints, ConstraintCategory};

/// Error type for all credential store operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "store errors should be handled appropriately"]
pub enum StoreError {
    /// A write was rejected because it would break a table constraint.
    #[error("Constraint violation: {0}")]
    Constraint(AccountConstraints),

    /// Unexpected error occurred.
    ///
    /// This can occur when an error is encountered that is not covered by the
    /// other error types.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl StoreError {
    /// Returns the violated constraint if this error represents one.
    pub fn constraint_violation(&self) -> Option<AccountConstraints> {
        match self {
            Self::Constraint(constraint) => Some(*constraint),
            Self::Unexpected(_) => None,
        }
    }

    /// Returns whether this error is a uniqueness violation.
    pub fn is_unique_violation(&self) -> bool {
        self.constraint_violation()
            .is_some_and(|c| c.categorize() == ConstraintCategory::Uniqueness)
    }
}

impl From<AccountConstraints> for StoreError {
    #[inline]
    fn from(value: AccountConstraints) -> Self {
        Self::Constraint(value)
    }
}

/// Specialized [`Result`] type for credential store operations.
pub type StoreResult<T, E = StoreError> = Result<T, E>;
