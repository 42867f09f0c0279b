//! Account status, role and profile administration.

use fridge_store::MemoryStore;
use fridge_store::model::{Account, UpdateAccount};
use fridge_store::query::AccountRepository;
use fridge_store::types::{AccountStatus, Role};
use uuid::Uuid;

use super::{AdminError, FieldErrors};
use crate::service::PasswordHasher;
use crate::utility::tracing_targets::TRACING_TARGET_ADMINISTRATION;

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New username.
    pub username: Option<String>,
    /// New plaintext password, hashed before it is stored.
    pub password: Option<String>,
}

/// Administrative operations over accounts.
///
/// Callers are expected to have checked the Admin role already; this service only
/// enforces the account rules.
#[derive(Debug, Clone)]
pub struct UserService<R = MemoryStore> {
    repository: R,
    password_hasher: PasswordHasher,
}

impl<R> UserService<R>
where
    R: AccountRepository + Send + Sync,
{
    /// Creates a new administration service.
    pub fn new(repository: R, password_hasher: PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Lists all accounts, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Account>, AdminError> {
        Ok(self.repository.list_accounts().await?)
    }

    /// Returns the account with the given identifier.
    pub async fn find_by_id(&self, account_id: Uuid) -> Result<Account, AdminError> {
        self.repository
            .find_account_by_id(account_id)
            .await?
            .ok_or(AdminError::NotFound)
    }

    /// Sets the account status. Setting the current status again succeeds.
    pub async fn change_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> Result<Account, AdminError> {
        let account = self
            .repository
            .set_account_status(account_id, status)
            .await?
            .ok_or(AdminError::NotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ADMINISTRATION,
            account_id = %account_id,
            status = %status,
            "account status changed"
        );

        Ok(account)
    }

    /// Grants a role. Granting a role the account already holds succeeds.
    pub async fn add_role(&self, account_id: Uuid, role: Role) -> Result<Account, AdminError> {
        let account = self
            .repository
            .add_account_role(account_id, role.clone())
            .await?
            .ok_or(AdminError::NotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ADMINISTRATION,
            account_id = %account_id,
            role = %role,
            "role granted"
        );

        Ok(account)
    }

    /// Revokes a role. Revoking a role the account does not hold succeeds.
    pub async fn remove_role(&self, account_id: Uuid, role: Role) -> Result<Account, AdminError> {
        let account = self
            .repository
            .remove_account_role(account_id, role.clone())
            .await?
            .ok_or(AdminError::NotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ADMINISTRATION,
            account_id = %account_id,
            role = %role,
            "role revoked"
        );

        Ok(account)
    }

    /// Applies a partial profile update.
    ///
    /// Fails with [`AdminError::NotFound`] for an unknown account and with
    /// [`AdminError::Conflict`] when the new username belongs to another account.
    pub async fn update_profile(
        &self,
        account_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Account, AdminError> {
        let current = self.find_by_id(account_id).await?;

        if let Some(username) = update.username.as_deref()
            && self
                .repository
                .username_exists_for_other(username, account_id)
                .await?
        {
            return Err(AdminError::Conflict(FieldErrors::username_taken()));
        }

        let password_hash = match update.password.as_deref() {
            Some(password) => Some(self.password_hasher.hash_password(password)?),
            None => None,
        };

        let changes = UpdateAccount {
            username: update.username,
            password_hash,
        };

        if changes.is_empty() {
            return Ok(current);
        }

        let password_changed = changes.password_hash.is_some();
        let account = self
            .repository
            .update_account(account_id, changes)
            .await
            .map_err(|e| match e.is_unique_violation() {
                true => AdminError::Conflict(FieldErrors::username_taken()),
                false => AdminError::Store(e),
            })?
            .ok_or(AdminError::NotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ADMINISTRATION,
            account_id = %account_id,
            username_changed = account.username != current.username,
            password_changed,
            "profile updated"
        );

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use fridge_store::model::NewAccount;

    use super::*;
    use crate::service::fast_hasher;

    async fn seeded(usernames: &[&str]) -> anyhow::Result<(UserService, Vec<Account>)> {
        let store = MemoryStore::new();
        let hasher = fast_hasher()?;

        let mut accounts = Vec::with_capacity(usernames.len());
        for username in usernames {
            let hash = hasher.hash_password("p")?;
            accounts.push(store.create_account(NewAccount::new(*username, hash)).await?);
        }

        Ok((UserService::new(store, hasher), accounts))
    }

    #[tokio::test]
    async fn change_status_is_idempotent() -> anyhow::Result<()> {
        let (service, accounts) = seeded(&["u1"]).await?;
        let id = accounts[0].id;

        let first = service.change_status(id, AccountStatus::Blocked).await?;
        let second = service.change_status(id, AccountStatus::Blocked).await?;
        assert!(first.status.is_blocked());
        assert!(second.status.is_blocked());

        let unblocked = service.change_status(id, AccountStatus::Active).await?;
        assert!(unblocked.is_active());
        Ok(())
    }

    #[tokio::test]
    async fn role_changes_use_set_semantics() -> anyhow::Result<()> {
        let (service, accounts) = seeded(&["u1"]).await?;
        let id = accounts[0].id;

        let removed = service.remove_role(id, Role::admin()).await?;
        assert!(removed.roles.is_empty());

        service.add_role(id, Role::admin()).await?;
        let account = service.add_role(id, Role::admin()).await?;
        assert_eq!(account.roles, BTreeSet::from([Role::admin()]));

        let account = service.remove_role(id, Role::admin()).await?;
        assert!(account.roles.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() -> anyhow::Result<()> {
        let (service, _) = seeded(&[]).await?;
        let ghost = Uuid::now_v7();

        assert!(matches!(service.find_by_id(ghost).await, Err(AdminError::NotFound)));
        assert!(matches!(
            service.change_status(ghost, AccountStatus::Blocked).await,
            Err(AdminError::NotFound)
        ));
        assert!(matches!(
            service.add_role(ghost, Role::admin()).await,
            Err(AdminError::NotFound)
        ));
        assert!(matches!(
            service.remove_role(ghost, Role::admin()).await,
            Err(AdminError::NotFound)
        ));

        let update = ProfileUpdate {
            username: Some("ghost".into()),
            password: None,
        };
        assert!(matches!(
            service.update_profile(ghost, update).await,
            Err(AdminError::NotFound)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() -> anyhow::Result<()> {
        let (service, accounts) = seeded(&["u1", "u2"]).await?;
        let update = ProfileUpdate {
            username: Some("U2".into()),
            password: Some("new-password".into()),
        };

        let result = service.update_profile(accounts[0].id, update).await;
        let Err(AdminError::Conflict(fields)) = result else {
            anyhow::bail!("expected a conflict");
        };
        assert!(fields.get("username").is_some());

        let unchanged = service.find_by_id(accounts[0].id).await?;
        assert_eq!(unchanged.username, "u1");
        assert_eq!(unchanged.password_hash, accounts[0].password_hash);
        Ok(())
    }

    #[tokio::test]
    async fn profile_update_applies_fields() -> anyhow::Result<()> {
        let (service, accounts) = seeded(&["u1"]).await?;
        let id = accounts[0].id;

        let recased = ProfileUpdate {
            username: Some("U1".into()),
            password: None,
        };
        let account = service.update_profile(id, recased).await?;
        assert_eq!(account.username, "U1");
        assert_eq!(account.password_hash, accounts[0].password_hash);

        let rekeyed = ProfileUpdate {
            username: None,
            password: Some("new-password".into()),
        };
        let account = service.update_profile(id, rekeyed).await?;
        assert_ne!(account.password_hash, accounts[0].password_hash);
        assert!(
            fast_hasher()?.verify_password("new-password", &account.password_hash)?
        );

        let empty = service.update_profile(id, ProfileUpdate::default()).await?;
        assert_eq!(empty.username, "U1");
        Ok(())
    }

    #[tokio::test]
    async fn list_returns_all_accounts() -> anyhow::Result<()> {
        let (service, accounts) = seeded(&["u1", "u2", "u3"]).await?;
        let listed = service.list_all().await?;

        let ids: Vec<Uuid> = listed.iter().map(|account| account.id).collect();
        let expected: Vec<Uuid> = accounts.iter().map(|account| account.id).collect();
        assert_eq!(ids, expected);
        Ok(())
    }
}
