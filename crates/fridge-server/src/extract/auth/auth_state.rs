//! Authenticated caller extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use jiff::Timestamp;

use super::{AuthClaims, RoleRequirement, authorize};
use crate::handler::Error;
use crate::service::SessionKeys;

/// Verified claims of the caller.
///
/// Behind the authorization middleware the claims it stored in the request
/// extensions are reused. Elsewhere the bearer token is verified on extraction,
/// without any role requirement.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl AuthState {
    /// Wraps claims that have already been verified.
    #[inline]
    #[must_use]
    pub const fn from_verified_claims(auth_claims: AuthClaims) -> Self {
        Self(auth_claims)
    }

    /// Returns the verified claims.
    #[inline]
    pub fn into_claims(self) -> AuthClaims {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_claims) = parts.extensions.get::<AuthClaims>() {
            return Ok(Self::from_verified_claims(auth_claims.clone()));
        }

        let session_keys = SessionKeys::from_ref(state);
        let requirement = RoleRequirement::authenticated();
        let auth_claims = authorize(&parts.headers, &session_keys, &requirement, Timestamp::now())?;

        parts.extensions.insert(auth_claims.clone());
        Ok(Self::from_verified_claims(auth_claims))
    }
}
