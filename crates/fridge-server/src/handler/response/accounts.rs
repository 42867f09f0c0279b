//! Account response types.

use std::collections::BTreeSet;

use fridge_store::model;
use fridge_store::types::{AccountStatus, Role};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an account, without its credentials.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier of the account.
    pub id: Uuid,
    /// Username of the account.
    pub username: String,
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
    pub fn from_model(account: model::Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            status: account.status,
            roles: account.roles,

            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }

    pub fn from_models(accounts: Vec<model::Account>) -> Vec<Self> {
        accounts.into_iter().map(Self::from_model).collect()
    }
}
