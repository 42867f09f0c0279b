//! Token issuance and verification.
//!
//! Tokens are HS256-signed JWTs over a shared secret loaded once at startup.
//! Verification checks the signature, structure, issuer and audience first, then
//! expiry against a caller-supplied clock.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use fridge_store::types::Role;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{AuthClaims, IssuedToken};
use crate::service::ServiceConfig;
use crate::service::config::MIN_JWT_SECRET_LEN;
use crate::utility::tracing_targets::TRACING_TARGET_SESSION_KEYS;
use crate::{Error, Result};

/// Failures of token issuance and verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token is malformed, forged, or meant for another issuer or audience.
    #[error("token is malformed or its signature is invalid")]
    Invalid(#[source] JwtError),
    /// The token is validly signed but past its expiry.
    #[error("token expired at {expired_at}")]
    Expired {
        /// Expiry time carried by the token.
        expired_at: Timestamp,
    },
    /// Signing a token failed.
    #[error("token could not be signed")]
    Signing(#[source] JwtError),
    /// The expiry of a new token falls outside the representable time range.
    #[error("token lifetime is out of range")]
    OutOfRange(#[source] jiff::Error),
}

impl TokenError {
    /// Returns whether the token was rejected only because it expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }
}

/// Signing keys and expiry policy for bearer tokens.
///
/// Cloning is cheap; all clones share the same key material.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    token_ttl: SignedDuration,
}

impl SessionKeys {
    /// Creates signing keys from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is shorter than 32 bytes or
    /// the token lifetime is not positive.
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        token_ttl: SignedDuration,
    ) -> Result<Self> {
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(Error::config(format!(
                "JWT secret must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }

        if !token_ttl.is_positive() {
            return Err(Error::config("Token TTL must be positive"));
        }

        let issuer = issuer.into();
        let audience = audience.into();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[audience.as_str()]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "exp"]);

        let inner = SessionKeysInner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            audience,
            token_ttl,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates signing keys from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let keys = Self::new(
            config.jwt_secret.as_bytes(),
            config.jwt_issuer.as_str(),
            config.jwt_audience.as_str(),
            config.token_ttl(),
        )?;

        tracing::info!(
            target: TRACING_TARGET_SESSION_KEYS,
            issuer = %config.jwt_issuer,
            audience = %config.jwt_audience,
            ttl_secs = config.token_ttl().as_secs(),
            "session keys loaded"
        );

        Ok(keys)
    }

    /// Returns the issuer identifier.
    #[inline]
    pub fn issuer(&self) -> &str {
        &self.inner.issuer
    }

    /// Returns the audience identifier.
    #[inline]
    pub fn audience(&self) -> &str {
        &self.inner.audience
    }

    /// Returns the lifetime of issued tokens.
    #[inline]
    pub fn token_ttl(&self) -> SignedDuration {
        self.inner.token_ttl
    }

    /// Issues a signed token for the account with the given role snapshot.
    ///
    /// `now` is truncated to whole seconds; the token expires at `now + ttl`.
    pub fn issue(
        &self,
        account_id: Uuid,
        roles: BTreeSet<Role>,
        now: Timestamp,
    ) -> Result<IssuedToken, TokenError> {
        let issued_at = Timestamp::from_second(now.as_second()).map_err(TokenError::OutOfRange)?;
        let expires_at = issued_at
            .checked_add(self.inner.token_ttl)
            .map_err(TokenError::OutOfRange)?;

        let claims = AuthClaims::new(
            self.inner.issuer.as_str(),
            self.inner.audience.as_str(),
            account_id,
            roles,
            issued_at,
            expires_at,
        );

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_SESSION_KEYS,
                error = %e,
                account_id = %account_id,
                "failed to encode JWT token"
            );

            TokenError::Signing(e)
        })?;

        Ok(IssuedToken { token, claims })
    }

    /// Verifies a token and returns its claims.
    ///
    /// Fails with [`TokenError::Invalid`] for any tampering, foreign key, issuer or
    /// audience mismatch, or malformed structure; and with [`TokenError::Expired`]
    /// when `now` is at or past the token's expiry.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<AuthClaims, TokenError> {
        let token_data = decode::<AuthClaims>(token, &self.inner.decoding_key, &self.inner.validation)
            .map_err(|e| {
                tracing::debug!(
                    target: TRACING_TARGET_SESSION_KEYS,
                    reason = jwt_error_reason(&e),
                    "token rejected"
                );

                TokenError::Invalid(e)
            })?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            tracing::debug!(
                target: TRACING_TARGET_SESSION_KEYS,
                token_id = %claims.token_id,
                account_id = %claims.account_id,
                expired_at = %claims.expires_at,
                "token expired"
            );

            return Err(TokenError::Expired {
                expired_at: claims.expires_at,
            });
        }

        Ok(claims)
    }
}

/// Short, log-safe label for a JWT decoding failure.
fn jwt_error_reason(error: &JwtError) -> &'static str {
    match error.kind() {
        JwtErrorKind::InvalidToken => "malformed",
        JwtErrorKind::InvalidSignature => "bad_signature",
        JwtErrorKind::InvalidAlgorithm => "bad_algorithm",
        JwtErrorKind::InvalidIssuer => "wrong_issuer",
        JwtErrorKind::InvalidAudience => "wrong_audience",
        JwtErrorKind::MissingRequiredClaim(_) => "missing_claim",
        JwtErrorKind::Json(_) => "undecodable",
        _ => "other",
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("algorithm", &Algorithm::HS256)
            .field("issuer", &self.inner.issuer)
            .field("audience", &self.inner.audience)
            .field("token_ttl", &self.inner.token_ttl)
            .finish_non_exhaustive()
    }
}
