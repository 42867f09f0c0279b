//! Process-local account store.

use std::collections::HashMap;
use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Account, NewAccount, UpdateAccount};
use crate::query::AccountRepository;
use crate::types::{AccountConstraints, AccountStatus, Role};
use crate::{StoreResult, TRACING_TARGET_CLIENT, TRACING_TARGET_QUERY};

/// In-memory credential store.
///
/// All records live behind a single lock, so each mutation observes and writes a
/// consistent view of the account table. Cloning the store is cheap and shares
/// the underlying table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<AccountTable>>,
}

#[derive(Debug, Default)]
struct AccountTable {
    accounts: HashMap<Uuid, Account>,
    /// Lowercased username to account id.
    usernames: HashMap<String, Uuid>,
}

/// Key used for case-insensitive username lookups.
fn username_key(username: &str) -> String {
    username.to_lowercase()
}

impl AccountTable {
    fn owner_of(&self, username: &str) -> Option<Uuid> {
        self.usernames.get(&username_key(username)).copied()
    }

    /// Applies `f` to the account and bumps `updated_at` when it reports a change.
    fn modify<F>(&mut self, account_id: Uuid, f: F) -> Option<Account>
    where
        F: FnOnce(&mut Account) -> bool,
    {
        let account = self.accounts.get_mut(&account_id)?;
        if f(account) {
            account.updated_at = Timestamp::now().max(account.updated_at);
        }

        Some(account.clone())
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        tracing::debug!(target: TRACING_TARGET_CLIENT, "created in-memory account store");
        Self::default()
    }

    /// Returns the number of stored accounts.
    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    /// Returns whether the store holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.accounts.is_empty()
    }
}

impl AccountRepository for MemoryStore {
    async fn create_account(&self, new_account: NewAccount) -> StoreResult<Account> {
        if new_account.username.trim().is_empty() {
            return Err(AccountConstraints::UsernameNotEmpty.into());
        }

        if new_account.password_hash.is_empty() {
            return Err(AccountConstraints::PasswordHashNotEmpty.into());
        }

        let mut table = self.inner.write().await;
        let key = username_key(&new_account.username);
        if table.usernames.contains_key(&key) {
            tracing::debug!(
                target: TRACING_TARGET_QUERY,
                constraint = %AccountConstraints::UsernameUnique,
                "rejected account creation"
            );

            return Err(AccountConstraints::UsernameUnique.into());
        }

        let now = Timestamp::now();
        let account = Account {
            id: Uuid::now_v7(),
            username: new_account.username,
            password_hash: new_account.password_hash,
            status: new_account.status,
            roles: new_account.roles,
            created_at: now,
            updated_at: now,
        };

        table.usernames.insert(key, account.id);
        table.accounts.insert(account.id, account.clone());

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            account_id = %account.id,
            "account created"
        );

        Ok(account)
    }

    async fn find_account_by_id(&self, account_id: Uuid) -> StoreResult<Option<Account>> {
        let table = self.inner.read().await;
        Ok(table.accounts.get(&account_id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let table = self.inner.read().await;
        let account = table
            .owner_of(username)
            .and_then(|id| table.accounts.get(&id))
            .cloned();

        Ok(account)
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let table = self.inner.read().await;
        let mut accounts: Vec<Account> = table.accounts.values().cloned().collect();
        // v7 identifiers are time-ordered, so they break creation-time ties.
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(accounts)
    }

    async fn update_account(
        &self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> StoreResult<Option<Account>> {
        if updates
            .username
            .as_deref()
            .is_some_and(|username| username.trim().is_empty())
        {
            return Err(AccountConstraints::UsernameNotEmpty.into());
        }

        if updates
            .password_hash
            .as_deref()
            .is_some_and(|hash| hash.is_empty())
        {
            return Err(AccountConstraints::PasswordHashNotEmpty.into());
        }

        let mut table = self.inner.write().await;
        let Some(current) = table.accounts.get(&account_id) else {
            return Ok(None);
        };

        let renamed = match updates.username {
            Some(username) => {
                if table.owner_of(&username).is_some_and(|id| id != account_id) {
                    tracing::debug!(
                        target: TRACING_TARGET_QUERY,
                        account_id = %account_id,
                        constraint = %AccountConstraints::UsernameUnique,
                        "rejected account update"
                    );

                    return Err(AccountConstraints::UsernameUnique.into());
                }

                Some((username_key(&current.username), username))
            }
            None => None,
        };

        if let Some((old_key, username)) = &renamed {
            table.usernames.remove(old_key);
            table.usernames.insert(username_key(username), account_id);
        }

        let account = table.modify(account_id, |account| {
            let mut changed = false;
            if let Some((_, username)) = renamed {
                changed |= account.username != username;
                account.username = username;
            }

            if let Some(password_hash) = updates.password_hash {
                account.password_hash = password_hash;
                changed = true;
            }

            changed
        });

        Ok(account)
    }

    async fn set_account_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> StoreResult<Option<Account>> {
        let mut table = self.inner.write().await;
        let account = table.modify(account_id, |account| {
            let changed = account.status != status;
            account.status = status;
            changed
        });

        Ok(account)
    }

    async fn add_account_role(&self, account_id: Uuid, role: Role) -> StoreResult<Option<Account>> {
        let mut table = self.inner.write().await;
        Ok(table.modify(account_id, |account| account.roles.insert(role)))
    }

    async fn remove_account_role(
        &self,
        account_id: Uuid,
        role: Role,
    ) -> StoreResult<Option<Account>> {
        let mut table = self.inner.write().await;
        Ok(table.modify(account_id, |account| account.roles.remove(&role)))
    }

    async fn username_exists_for_other(
        &self,
        username: &str,
        exclude_id: Uuid,
    ) -> StoreResult<bool> {
        let table = self.inner.read().await;
        Ok(table.owner_of(username).is_some_and(|id| id != exclude_id))
    }

    async fn delete_account(&self, account_id: Uuid) -> StoreResult<Option<Account>> {
        let mut table = self.inner.write().await;
        let Some(account) = table.accounts.remove(&account_id) else {
            return Ok(None);
        };

        table.usernames.remove(&username_key(&account.username));
        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            account_id = %account_id,
            "account deleted"
        );

        Ok(Some(account))
    }
}
