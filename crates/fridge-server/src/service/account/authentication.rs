//! Sign-in, registration and administrator bootstrap.

use fridge_store::MemoryStore;
use fridge_store::model::{Account, NewAccount};
use fridge_store::query::AccountRepository;
use fridge_store::types::Role;
use jiff::Timestamp;

use super::{AuthError, FieldErrors};
use crate::service::{IssuedToken, PasswordHasher, SessionKeys};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Authenticates credentials and issues tokens.
#[derive(Debug, Clone)]
pub struct AuthService<R = MemoryStore> {
    repository: R,
    password_hasher: PasswordHasher,
    session_keys: SessionKeys,
}

impl<R> AuthService<R>
where
    R: AccountRepository + Send + Sync,
{
    /// Creates a new authentication service.
    pub fn new(repository: R, password_hasher: PasswordHasher, session_keys: SessionKeys) -> Self {
        Self {
            repository,
            password_hasher,
            session_keys,
        }
    }

    /// Authenticates a username/password pair and issues a token at `now`.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// [`AuthError::InvalidCredentials`]; both paths perform a full password
    /// verification. A blocked account fails with [`AuthError::AccountBlocked`]
    /// even when the password is correct.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        now: Timestamp,
    ) -> Result<IssuedToken, AuthError> {
        let Some(account) = self.repository.find_account_by_username(username).await? else {
            self.password_hasher.verify_dummy_password(password);
            tracing::info!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_exists = false,
                "sign-in refused"
            );

            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify_password(password, &account.password_hash)?
        {
            tracing::info!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %account.id,
                "sign-in refused: wrong password"
            );

            return Err(AuthError::InvalidCredentials);
        }

        if !account.is_active() {
            tracing::info!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %account.id,
                "sign-in refused: account blocked"
            );

            return Err(AuthError::AccountBlocked);
        }

        let issued = self.session_keys.issue(account.id, account.roles, now)?;
        tracing::info!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %account.id,
            token_id = %issued.claims.token_id,
            expires_at = %issued.claims.expires_at,
            "token issued"
        );

        Ok(issued)
    }

    /// Registers a new active account without roles.
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        if self
            .repository
            .find_account_by_username(username)
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict(FieldErrors::username_taken()));
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let account = self
            .create(NewAccount::new(username, password_hash))
            .await?;

        tracing::info!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %account.id,
            "account registered"
        );

        Ok(account)
    }

    /// Makes sure an administrator account with the given username exists.
    ///
    /// Creates the account with the Admin role if it is missing; otherwise grants
    /// the Admin role to the existing account and leaves its password unchanged.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        if let Some(existing) = self.repository.find_account_by_username(username).await? {
            let account = self
                .repository
                .add_account_role(existing.id, Role::admin())
                .await?
                .unwrap_or(existing);

            tracing::info!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %account.id,
                "administrator account present"
            );

            return Ok(account);
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let new_account = NewAccount::new(username, password_hash).with_role(Role::admin());
        let account = self.create(new_account).await?;

        tracing::info!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %account.id,
            "administrator account created"
        );

        Ok(account)
    }

    async fn create(&self, new_account: NewAccount) -> Result<Account, AuthError> {
        self.repository
            .create_account(new_account)
            .await
            .map_err(|e| match e.is_unique_violation() {
                true => AuthError::Conflict(FieldErrors::username_taken()),
                false => AuthError::Store(e),
            })
    }
}
