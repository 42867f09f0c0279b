//! Role names attached to accounts.

use std::borrow::Borrow;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Longest accepted role name, in characters.
const MAX_ROLE_LENGTH: usize = 64;

/// Reasons a role name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    /// The name is empty after trimming.
    #[error("role name must not be empty")]
    Empty,
    /// The name contains whitespace or a control character.
    #[error("role name contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The name is longer than the accepted maximum.
    #[error("role name must be at most 64 characters")]
    TooLong,
}

/// Named permission label attached to an account, e.g. `Admin`.
///
/// Role names are case-sensitive and compared exactly. A set of roles is kept as a
/// `BTreeSet<Role>`, which gives duplicate-free, sorted serialization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    /// Name of the administrator role.
    pub const ADMIN: &'static str = "Admin";

    /// Validates and wraps a role name. Surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, RoleError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(RoleError::Empty);
        }

        if let Some(c) = name.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(RoleError::InvalidCharacter(c));
        }

        if name.chars().count() > MAX_ROLE_LENGTH {
            return Err(RoleError::TooLong);
        }

        Ok(Self(name.to_owned()))
    }

    /// Returns the administrator role.
    pub fn admin() -> Self {
        Self(Self::ADMIN.to_owned())
    }

    /// Returns the role name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this is the administrator role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl AsRef<str> for Role {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Role {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Role {
    type Error = RoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Role> for String {
    #[inline]
    fn from(value: Role) -> Self {
        value.0
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
