//! Account records held by the credential store.
//!
//! ## Models
//!
//! - [`Account`] - Stored account with credentials, status and roles
//! - [`NewAccount`] - Data structure for creating new accounts
//! - [`UpdateAccount`] - Partial profile update

use std::collections::BTreeSet;

use jiff::Timestamp;
use uuid::Uuid;

use crate::types::{AccountStatus, Role};

/// Account record as held by the store.
///
/// The record carries the password hash and is never serialized directly; HTTP
/// responses use a sanitized view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Username as entered at registration; unique ignoring letter case.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Whether the account may sign in.
    pub status: AccountStatus,
    /// Roles granted to the account.
    pub roles: BTreeSet<Role>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

impl Account {
    /// Returns whether the account may sign in.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns whether the account holds the given role.
    #[inline]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns whether the account holds the administrator role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::ADMIN)
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Requested username.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Initial status.
    pub status: AccountStatus,
    /// Initial roles.
    pub roles: BTreeSet<Role>,
}

impl NewAccount {
    /// Creates an active account request with no roles.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            status: AccountStatus::Active,
            roles: BTreeSet::new(),
        }
    }

    /// Adds an initial role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial profile update. Only fields set to `Some` are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    /// New username.
    pub username: Option<String>,
    /// New PHC-formatted password hash.
    pub password_hash: Option<String>,
}

impl UpdateAccount {
    /// Returns whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password_hash.is_none()
    }
}
