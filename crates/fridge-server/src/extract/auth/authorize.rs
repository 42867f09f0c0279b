//! Per-request access decision.
//!
//! [`authorize`] turns request headers into verified claims or an
//! [`AccessDenied`] outcome. It keeps no state between requests: every protected
//! request is decided from its own bearer token.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use fridge_store::types::Role;
use jiff::Timestamp;

use crate::handler::{Error, ErrorKind};
use crate::service::{AuthClaims, SessionKeys, TokenError};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHORIZATION;

/// Roles a route accepts.
///
/// The requirement is met when the token asserts at least one of the listed
/// roles. An empty list accepts any verified token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleRequirement {
    any_of: Arc<[Role]>,
}

impl RoleRequirement {
    /// Accepts any verified token.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Accepts tokens asserting at least one of the given roles.
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            any_of: roles.into_iter().collect(),
        }
    }

    /// Accepts tokens asserting the administrator role.
    pub fn admin() -> Self {
        Self::any_of([Role::admin()])
    }

    /// Returns the accepted roles.
    pub fn roles(&self) -> &[Role] {
        &self.any_of
    }

    /// Returns whether the claims meet this requirement.
    pub fn is_satisfied_by(&self, claims: &AuthClaims) -> bool {
        self.any_of.is_empty() || claims.has_any_role(self.any_of.iter())
    }
}

/// Why a request was refused.
#[derive(Debug, thiserror::Error)]
pub enum AccessDenied {
    /// No `Authorization` header was sent.
    #[error("missing bearer token")]
    MissingToken,
    /// The `Authorization` header is not a bearer token.
    #[error("malformed authorization header")]
    MalformedToken,
    /// The token failed verification.
    #[error(transparent)]
    InvalidToken(#[from] TokenError),
    /// The token is valid but asserts none of the required roles.
    #[error("token lacks a required role")]
    Forbidden,
}

impl AccessDenied {
    /// Returns whether the caller could not be authenticated at all.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::Forbidden)
    }
}

/// Decides whether a request carrying `headers` may proceed at `now`.
///
/// The bearer token is verified first; the role requirement is only checked for
/// a verified token.
pub fn authorize(
    headers: &HeaderMap,
    session_keys: &SessionKeys,
    requirement: &RoleRequirement,
    now: Timestamp,
) -> Result<AuthClaims, AccessDenied> {
    if !headers.contains_key(AUTHORIZATION) {
        return Err(AccessDenied::MissingToken);
    }

    let bearer = match headers.typed_try_get::<Authorization<Bearer>>() {
        Ok(Some(bearer)) => bearer,
        Ok(None) => return Err(AccessDenied::MissingToken),
        Err(_) => return Err(AccessDenied::MalformedToken),
    };

    let claims = session_keys.verify(bearer.token(), now)?;
    if !requirement.is_satisfied_by(&claims) {
        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %claims.account_id,
            token_id = %claims.token_id,
            required = ?requirement.roles(),
            "access denied: missing required role"
        );

        return Err(AccessDenied::Forbidden);
    }

    tracing::debug!(
        target: TRACING_TARGET_AUTHORIZATION,
        account_id = %claims.account_id,
        token_id = %claims.token_id,
        "access granted"
    );

    Ok(claims)
}

impl From<AccessDenied> for Error<'static> {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::MissingToken => ErrorKind::MissingAuthToken
                .with_message("Authentication required")
                .with_context("Missing Authorization header with Bearer token")
                .with_resource("authentication"),
            AccessDenied::MalformedToken => ErrorKind::MalformedAuthToken
                .with_message("Invalid token format")
                .with_context("Authorization header must contain a valid Bearer token")
                .with_resource("authentication"),
            AccessDenied::InvalidToken(error) => {
                if error.is_expired() {
                    tracing::info!(
                        target: TRACING_TARGET_AUTHORIZATION,
                        error = %error,
                        "expired token presented"
                    );
                } else {
                    tracing::warn!(
                        target: TRACING_TARGET_AUTHORIZATION,
                        error = %error,
                        "invalid token presented"
                    );
                }

                Error::from(error).with_resource("authentication")
            }
            AccessDenied::Forbidden => ErrorKind::Forbidden
                .with_message("Route requires a role the token does not assert")
                .with_resource("authorization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use axum::http::HeaderValue;
    use jiff::SignedDuration;
    use uuid::Uuid;

    use super::*;
    use crate::service::test_keys;

    fn bearer_headers(token: &str) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        Ok(headers)
    }

    #[test]
    fn missing_and_malformed_headers() -> anyhow::Result<()> {
        let keys = test_keys()?;
        let now = Timestamp::now();
        let requirement = RoleRequirement::authenticated();

        let missing = authorize(&HeaderMap::new(), &keys, &requirement, now);
        assert!(matches!(missing, Err(AccessDenied::MissingToken)));

        let mut basic = HeaderMap::new();
        basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        let malformed = authorize(&basic, &keys, &requirement, now);
        assert!(matches!(malformed, Err(AccessDenied::MalformedToken)));
        Ok(())
    }

    #[test]
    fn role_requirement_is_enforced() -> anyhow::Result<()> {
        let keys = test_keys()?;
        let now = Timestamp::now();
        let plain = keys.issue(Uuid::now_v7(), BTreeSet::new(), now)?;
        let admin = keys.issue(Uuid::now_v7(), BTreeSet::from([Role::admin()]), now)?;

        let forbidden = authorize(&bearer_headers(&plain.token)?, &keys, &RoleRequirement::admin(), now);
        assert!(matches!(forbidden, Err(AccessDenied::Forbidden)));
        assert!(forbidden.is_err_and(|denied| !denied.is_unauthenticated()));

        let granted = authorize(&bearer_headers(&admin.token)?, &keys, &RoleRequirement::admin(), now)?;
        assert_eq!(granted.account_id, admin.claims.account_id);

        let any = authorize(&bearer_headers(&plain.token)?, &keys, &RoleRequirement::authenticated(), now)?;
        assert!(any.roles.is_empty());
        Ok(())
    }

    #[test]
    fn expired_token_is_unauthenticated() -> anyhow::Result<()> {
        let keys = test_keys()?;
        let issued_at = Timestamp::now();
        let admin = keys.issue(Uuid::now_v7(), BTreeSet::from([Role::admin()]), issued_at)?;

        let later = issued_at.checked_add(SignedDuration::from_secs(3601))?;
        let denied = authorize(&bearer_headers(&admin.token)?, &keys, &RoleRequirement::admin(), later);

        let Err(AccessDenied::InvalidToken(error)) = denied else {
            anyhow::bail!("expected an invalid token");
        };
        assert!(error.is_expired());
        Ok(())
    }

    #[test]
    fn denials_map_to_distinct_statuses() {
        use axum::http::StatusCode;

        let status = |denied: AccessDenied| Error::from(denied).kind().status_code();
        assert_eq!(status(AccessDenied::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AccessDenied::MalformedToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AccessDenied::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn any_of_accepts_listed_roles() -> anyhow::Result<()> {
        let keys = test_keys()?;
        let viewer = Role::new("Viewer")?;
        let requirement = RoleRequirement::any_of([Role::admin(), viewer.clone()]);

        let claims = keys
            .issue(Uuid::now_v7(), BTreeSet::from([viewer]), Timestamp::now())?
            .claims;
        assert!(requirement.is_satisfied_by(&claims));
        assert!(!RoleRequirement::admin().is_satisfied_by(&claims));
        Ok(())
    }
}
