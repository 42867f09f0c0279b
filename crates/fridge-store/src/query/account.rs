//! Account repository for managing user accounts.

use std::future::Future;

use uuid::Uuid;

use crate::StoreResult;
use crate::model::{Account, NewAccount, UpdateAccount};
use crate::types::{AccountStatus, Role};

/// Repository for account operations.
///
/// Every mutation is atomic per record: concurrent role and status changes on the
/// same account never lose each other's effects. Username uniqueness is
/// case-insensitive.
pub trait AccountRepository {
    /// Creates a new account.
    ///
    /// Fails with a uniqueness violation when another account already uses the
    /// username in any letter case.
    fn create_account(
        &self,
        new_account: NewAccount,
    ) -> impl Future<Output = StoreResult<Account>> + Send;

    /// Finds an account by its unique identifier.
    fn find_account_by_id(
        &self,
        account_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;

    /// Finds an account by username, ignoring letter case.
    fn find_account_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;

    /// Lists all accounts in creation order.
    fn list_accounts(&self) -> impl Future<Output = StoreResult<Vec<Account>>> + Send;

    /// Applies a partial profile update.
    ///
    /// Returns `None` if the account was not found. A username taken by another
    /// account is a uniqueness violation; renaming an account to a different
    /// letter case of its own username is allowed.
    fn update_account(
        &self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;

    /// Sets the account status. Returns `None` if the account was not found.
    fn set_account_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;

    /// Adds a role to the account's role set. Adding a held role is a no-op.
    fn add_account_role(
        &self,
        account_id: Uuid,
        role: Role,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;

    /// Removes a role from the account's role set. Removing an absent role is a no-op.
    fn remove_account_role(
        &self,
        account_id: Uuid,
        role: Role,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;

    /// Returns whether a different account already uses the username.
    fn username_exists_for_other(
        &self,
        username: &str,
        exclude_id: Uuid,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Permanently removes an account. Returns the removed record, if any.
    fn delete_account(
        &self,
        account_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;
}
