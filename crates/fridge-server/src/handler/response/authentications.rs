//! Authentication response types.

use std::collections::BTreeSet;

use fridge_store::types::Role;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::{AuthClaims, IssuedToken};

/// Token type reported alongside every issued token.
const BEARER: &str = "Bearer";

/// Response returned after a successful sign-in.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// The signed bearer token.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// ID of the authenticated account.
    pub account_id: Uuid,
    /// Roles asserted by the token.
    pub roles: BTreeSet<Role>,
    /// Timestamp when the token was issued.
    pub issued_at: Timestamp,
    /// Timestamp when the token expires.
    pub expires_at: Timestamp,
}

impl SignInResponse {
    pub fn from_issued(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: BEARER.to_owned(),
            account_id: issued.claims.account_id,
            roles: issued.claims.roles,
            issued_at: issued.claims.issued_at,
            expires_at: issued.claims.expires_at,
        }
    }
}

/// Claims held by the caller's token.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsResponse {
    /// ID of the authenticated account.
    pub account_id: Uuid,
    /// Roles asserted by the token.
    pub roles: BTreeSet<Role>,
    /// Timestamp when the token was issued.
    pub issued_at: Timestamp,
    /// Timestamp when the token expires.
    pub expires_at: Timestamp,
}

impl ClaimsResponse {
    pub fn from_claims(claims: AuthClaims) -> Self {
        Self {
            account_id: claims.account_id,
            roles: claims.roles,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        }
    }
}
