//! JWT claims carried by bearer tokens.

use std::collections::BTreeSet;

use fridge_store::types::Role;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for authentication tokens.
///
/// Registered claims use their RFC 7519 names; `iat` and `exp` are whole seconds
/// since the Unix epoch. The `roles` claim is a snapshot of the account's role set
/// at issuance and is never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    // Standard (or registered) claims.
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: String,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: String,

    /// JWT ID (unique identifier for the token).
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Subject (identifier of the authenticated account).
    #[serde(rename = "sub")]
    pub account_id: Uuid,

    /// Issued at.
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time.
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,

    // Private (or custom) claims.
    /// Roles held by the account when the token was issued.
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl AuthClaims {
    pub(crate) fn new(
        issued_by: impl Into<String>,
        audience: impl Into<String>,
        account_id: Uuid,
        roles: BTreeSet<Role>,
        issued_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            issued_by: issued_by.into(),
            audience: audience.into(),
            token_id: Uuid::new_v4(),
            account_id,
            issued_at,
            expires_at,
            roles,
        }
    }

    /// Returns the issuer identifier.
    #[inline]
    pub fn issuer(&self) -> &str {
        &self.issued_by
    }

    /// Returns the audience identifier.
    #[inline]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Returns whether the token asserts the given role.
    #[inline]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns whether the token asserts at least one of the given roles.
    pub fn has_any_role<'r>(&self, roles: impl IntoIterator<Item = &'r Role>) -> bool {
        roles.into_iter().any(|role| self.roles.contains(role))
    }

    /// Returns whether the token asserts the administrator role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::ADMIN)
    }

    /// Returns whether the token is expired at `now`.
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Returns the remaining lifetime at `now`, or zero if already expired.
    #[must_use]
    pub fn remaining_lifetime(&self, now: Timestamp) -> SignedDuration {
        let remaining = self.expires_at.duration_since(now);
        if remaining.is_positive() {
            remaining
        } else {
            SignedDuration::ZERO
        }
    }
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT serialization.
    pub token: String,
    /// Claims signed into the token.
    pub claims: AuthClaims,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_at(issued_at: Timestamp) -> anyhow::Result<AuthClaims> {
        let expires_at = issued_at.checked_add(SignedDuration::from_secs(60))?;
        let roles = BTreeSet::from([Role::admin()]);
        Ok(AuthClaims::new(
            "fridge-auth",
            "fridge-api",
            Uuid::now_v7(),
            roles,
            issued_at,
            expires_at,
        ))
    }

    #[test]
    fn serializes_registered_claim_names() -> anyhow::Result<()> {
        let claims = claims_at(Timestamp::from_second(1_700_000_000)?)?;
        let json = serde_json::to_value(&claims)?;

        assert_eq!(json["iss"], "fridge-auth");
        assert_eq!(json["aud"], "fridge-api");
        assert_eq!(json["iat"], 1_700_000_000_i64);
        assert_eq!(json["exp"], 1_700_000_060_i64);
        assert_eq!(json["roles"], serde_json::json!(["Admin"]));
        assert_eq!(json["sub"], claims.account_id.to_string());

        let parsed: AuthClaims = serde_json::from_value(json)?;
        assert_eq!(parsed, claims);
        Ok(())
    }

    #[test]
    fn expiry_is_inclusive_of_exp() -> anyhow::Result<()> {
        let issued_at = Timestamp::from_second(1_700_000_000)?;
        let claims = claims_at(issued_at)?;

        let before = issued_at.checked_add(SignedDuration::from_secs(59))?;
        assert!(!claims.is_expired_at(before));
        assert_eq!(claims.remaining_lifetime(before), SignedDuration::from_secs(1));

        assert!(claims.is_expired_at(claims.expires_at));
        assert_eq!(
            claims.remaining_lifetime(claims.expires_at),
            SignedDuration::ZERO
        );
        Ok(())
    }

    #[test]
    fn role_checks() -> anyhow::Result<()> {
        let claims = claims_at(Timestamp::from_second(1_700_000_000)?)?;
        assert!(claims.is_admin());
        assert!(claims.has_any_role(&[Role::new("Viewer")?, Role::admin()]));
        assert!(!claims.has_any_role(&[Role::new("Viewer")?]));
        assert!(!claims.has_any_role(&[]));
        Ok(())
    }
}
