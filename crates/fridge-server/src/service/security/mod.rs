//! Credential hashing and token signing.

mod auth_claims;
mod password_hasher;
mod session_keys;

pub use auth_claims::{AuthClaims, IssuedToken};
pub use password_hasher::{HashError, PasswordHasher};
pub use session_keys::{SessionKeys, TokenError};

#[cfg(test)]
pub(crate) use password_hasher::tests::fast_hasher;
#[cfg(test)]
pub(crate) use session_keys::tests::test_keys;
