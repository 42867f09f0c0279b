//! Role-based authorization middleware.
//!
//! Routes declare the roles they accept as a [`RoleRequirement`]; the middleware
//! verifies the bearer token on every request and stores the claims in the
//! request extensions for [`AuthState`].
//!
//! [`AuthState`]: crate::extract::AuthState

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use jiff::Timestamp;

use crate::extract::{RoleRequirement, authorize};
use crate::handler::Result;
use crate::service::{ServiceState, SessionKeys};

/// State of the authorization middleware: the verifying keys and the roles a
/// group of routes accepts.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session_keys: SessionKeys,
    requirement: RoleRequirement,
}

impl RouteGuard {
    /// Creates a guard enforcing `requirement` with the given keys.
    pub fn new(session_keys: SessionKeys, requirement: RoleRequirement) -> Self {
        Self {
            session_keys,
            requirement,
        }
    }
}

/// Extension trait for `axum::`[`Router`] to apply authorization middleware.
///
/// Layers are added with `route_layer`, so unmatched paths still reach the
/// fallback instead of being refused.
pub trait RouterAuthExt<S> {
    /// Requires a valid bearer token for all routes.
    fn with_authentication(self, state: &ServiceState) -> Self;

    /// Requires a valid bearer token asserting one of the given roles.
    fn with_required_roles(self, state: &ServiceState, requirement: RoleRequirement) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_authentication(self, state: &ServiceState) -> Self {
        self.with_required_roles(state, RoleRequirement::authenticated())
    }

    fn with_required_roles(self, state: &ServiceState, requirement: RoleRequirement) -> Self {
        let guard = RouteGuard::new(state.session_keys.clone(), requirement);
        self.route_layer(from_fn_with_state(guard, require_roles))
    }
}

/// Verifies the bearer token against the guard's requirement.
///
/// Responds `401` for a missing, malformed, invalid or expired token and `403`
/// for a valid token without an accepted role.
pub async fn require_roles(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_claims = authorize(
        request.headers(),
        &guard.session_keys,
        &guard.requirement,
        Timestamp::now(),
    )?;

    request.extensions_mut().insert(auth_claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;
    use fridge_store::MemoryStore;
    use fridge_store::types::Role;
    use uuid::Uuid;

    use super::*;
    use crate::extract::AuthState;
    use crate::service::{fast_hasher, test_keys};

    async fn whoami(AuthState(claims): AuthState) -> String {
        claims.account_id.to_string()
    }

    fn server() -> anyhow::Result<(TestServer, SessionKeys)> {
        let keys = test_keys()?;
        let state = ServiceState::new(MemoryStore::new(), fast_hasher()?, keys.clone());

        let app = Router::new()
            .route("/admin", get(whoami))
            .with_required_roles(&state, RoleRequirement::admin())
            .merge(
                Router::new()
                    .route("/member", get(whoami))
                    .with_authentication(&state),
            )
            .with_state(state);

        Ok((TestServer::new(app)?, keys))
    }

    #[tokio::test]
    async fn forbidden_differs_from_unauthenticated() -> anyhow::Result<()> {
        let (server, keys) = server()?;
        let plain = keys.issue(Uuid::now_v7(), BTreeSet::new(), Timestamp::now())?;

        let missing = server.get("/admin").await;
        missing.assert_status_unauthorized();
        let body: serde_json::Value = missing.json();
        assert_eq!(body["name"], "missing_auth_token");

        let forbidden = server
            .get("/admin")
            .authorization_bearer(&plain.token)
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = forbidden.json();
        assert_eq!(body["name"], "forbidden");
        Ok(())
    }

    #[tokio::test]
    async fn claims_reach_the_handler() -> anyhow::Result<()> {
        let (server, keys) = server()?;
        let admin = keys.issue(Uuid::now_v7(), BTreeSet::from([Role::admin()]), Timestamp::now())?;
        let plain = keys.issue(Uuid::now_v7(), BTreeSet::new(), Timestamp::now())?;

        let response = server.get("/admin").authorization_bearer(&admin.token).await;
        response.assert_status_ok();
        response.assert_text(admin.claims.account_id.to_string());

        let response = server.get("/member").authorization_bearer(&plain.token).await;
        response.assert_status_ok();
        response.assert_text(plain.claims.account_id.to_string());
        Ok(())
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() -> anyhow::Result<()> {
        let (server, _) = server()?;

        let response = server.get("/member").authorization_bearer("not-a-jwt").await;
        response.assert_status_unauthorized();
        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "unauthorized");

        let response = server
            .get("/member")
            .add_header("authorization", "Basic dXNlcjpwYXNz")
            .await;
        response.assert_status_unauthorized();
        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "malformed_auth_token");
        Ok(())
    }
}
