//! Application state and dependency injection.

mod account;
mod config;
mod security;

use fridge_store::MemoryStore;

pub use crate::service::account::{
    AdminError, AuthError, AuthService, FieldErrors, ProfileUpdate, UserService,
};
pub use crate::service::config::{MIN_JWT_SECRET_LEN, ServiceConfig};
pub use crate::service::security::{
    AuthClaims, HashError, IssuedToken, PasswordHasher, SessionKeys, TokenError,
};
#[cfg(test)]
pub(crate) use crate::service::security::{fast_hasher, test_keys};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};
use crate::utility::tracing_targets::TRACING_TARGET_SERVICE;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub store: MemoryStore,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub session_keys: SessionKeys,
}

impl ServiceState {
    /// Assembles application state from already constructed components.
    pub fn new(store: MemoryStore, password_hasher: PasswordHasher, session_keys: SessionKeys) -> Self {
        Self {
            store,
            password_hasher,
            session_keys,
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Validates the configuration, loads the signing keys, and creates or
    /// promotes the administrator account when its credentials are configured.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        service_config.validate()?;

        let service_state = Self::new(
            MemoryStore::new(),
            PasswordHasher::from_config(service_config)?,
            SessionKeys::from_config(service_config)?,
        );

        if let Some((username, password)) = service_config.admin_credentials() {
            let account = service_state
                .auth_service()
                .ensure_admin(username, password)
                .await?;

            tracing::info!(
                target: TRACING_TARGET_SERVICE,
                account_id = %account.id,
                "administrator bootstrap complete"
            );
        }

        Ok(service_state)
    }

    /// Returns the authentication service over the shared store.
    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.store.clone(),
            self.password_hasher.clone(),
            self.session_keys.clone(),
        )
    }

    /// Returns the user administration service over the shared store.
    pub fn user_service(&self) -> UserService {
        UserService::new(self.store.clone(), self.password_hasher.clone())
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(store: MemoryStore);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(session_keys: SessionKeys);

impl axum::extract::FromRef<ServiceState> for AuthService {
    fn from_ref(state: &ServiceState) -> Self {
        state.auth_service()
    }
}

impl axum::extract::FromRef<ServiceState> for UserService {
    fn from_ref(state: &ServiceState) -> Self {
        state.user_service()
    }
}
