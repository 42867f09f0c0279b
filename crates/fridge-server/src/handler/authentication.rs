//! Authentication handlers for sign-in, registration and claim inspection.
//!
//! Sign-in answers every refusal with the same `401` body, whether the username is
//! unknown, the password is wrong or the account is blocked.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use jiff::Timestamp;

use crate::extract::{AuthState, Json, ValidateJson};
use crate::handler::Result;
use crate::handler::request::{SignIn, SignUp};
use crate::handler::response::{Account, ClaimsResponse, SignInResponse};
use crate::service::{AuthService, ServiceState};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "fridge_server::handler::authentication";

/// Exchanges a username and password for a bearer token.
#[tracing::instrument(skip_all)]
async fn sign_in(
    State(auth_service): State<AuthService>,
    ValidateJson(request): ValidateJson<SignIn>,
) -> Result<(StatusCode, Json<SignInResponse>)> {
    tracing::debug!(target: TRACING_TARGET, "sign-in requested");

    let issued = auth_service
        .sign_in(&request.username, &request.password, Timestamp::now())
        .await?;

    Ok((StatusCode::OK, Json(SignInResponse::from_issued(issued))))
}

/// Registers a new active account without roles.
#[tracing::instrument(skip_all)]
async fn sign_up(
    State(auth_service): State<AuthService>,
    ValidateJson(request): ValidateJson<SignUp>,
) -> Result<(StatusCode, Json<Account>)> {
    let account = auth_service
        .sign_up(&request.username, &request.password)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "account created via sign-up"
    );

    Ok((StatusCode::CREATED, Json(Account::from_model(account))))
}

/// Returns the claims carried by the caller's token.
#[tracing::instrument(skip_all)]
async fn me(auth_state: AuthState) -> Result<(StatusCode, Json<ClaimsResponse>)> {
    let auth_claims = auth_state.into_claims();
    Ok((StatusCode::OK, Json(ClaimsResponse::from_claims(auth_claims))))
}

/// Returns routes reachable without a token.
pub fn public_routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/sign-up", post(sign_up))
}

/// Returns routes requiring a verified token.
pub fn private_routes() -> Router<ServiceState> {
    Router::new().route("/api/auth/me", get(me))
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use fridge_store::query::AccountRepository;
    use fridge_store::types::{AccountStatus, Role};
    use serde_json::json;

    use super::*;
    use crate::handler::test::{create_test_server, sign_in as sign_in_token, sign_in_admin};

    #[tokio::test]
    async fn sign_up_then_sign_in() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let request = SignUp {
            username: "fridge_owner".to_owned(),
            password: "cold-storage".to_owned(),
        };
        let response = server.post("/api/auth/sign-up").json(&request).await;
        response.assert_status(StatusCode::CREATED);

        let account: Account = response.json();
        assert_eq!(account.username, "fridge_owner");
        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.roles.is_empty());

        let body: serde_json::Value = response.json();
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("password").is_none());

        let request = SignIn {
            username: "fridge_owner".to_owned(),
            password: "cold-storage".to_owned(),
        };
        let response = server.post("/api/auth/sign-in").json(&request).await;
        response.assert_status_ok();

        let body: SignInResponse = response.json();
        assert_eq!(body.account_id, account.id);
        assert_eq!(body.token_type, "Bearer");
        assert!(body.roles.is_empty());
        assert!(body.expires_at > body.issued_at);
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_username() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let request = json!({ "username": "ROOT", "password": "whatever" });
        let response = server.post("/api/auth/sign-up").json(&request).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "unprocessable_entity");
        assert!(body["errors"]["username"].is_array());
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_validates_fields() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;

        let request = json!({ "username": "a b", "password": "" });
        let response = server.post("/api/auth/sign-up").json(&request).await;
        response.assert_status_bad_request();

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "bad_request");
        assert!(body["errors"]["username"].is_array());
        assert!(body["errors"]["password"].is_array());
        assert_eq!(state.store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_failures_are_indistinguishable() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let account = state.auth_service().sign_up("user1", "p").await?;

        let wrong_password = server
            .post("/api/auth/sign-in")
            .json(&json!({ "username": "user1", "password": "nope" }))
            .await;
        let unknown_user = server
            .post("/api/auth/sign-in")
            .json(&json!({ "username": "ghost", "password": "p" }))
            .await;

        state
            .store
            .set_account_status(account.id, AccountStatus::Blocked)
            .await?;
        let blocked = server
            .post("/api/auth/sign-in")
            .json(&json!({ "username": "user1", "password": "p" }))
            .await;

        wrong_password.assert_status_unauthorized();
        unknown_user.assert_status_unauthorized();
        blocked.assert_status_unauthorized();

        let wrong_password = wrong_password.text();
        assert_eq!(wrong_password, unknown_user.text());
        assert_eq!(wrong_password, blocked.text());
        assert!(!wrong_password.contains("token"));
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_checks_presence_only() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let reference = server
            .post("/api/auth/sign-in")
            .json(&json!({ "username": "ghost", "password": "p" }))
            .await;
        reference.assert_status_unauthorized();

        for username in ["x", "fridge admin", "tab\tname"] {
            let response = server
                .post("/api/auth/sign-in")
                .json(&json!({ "username": username, "password": "p" }))
                .await;
            response.assert_status_unauthorized();
            assert_eq!(response.text(), reference.text());
        }

        let response = server
            .post("/api/auth/sign-in")
            .json(&json!({ "username": "", "password": "" }))
            .await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"]["username"].is_array());
        assert!(body["errors"]["password"].is_array());
        Ok(())
    }

    #[tokio::test]
    async fn me_reports_role_snapshot() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;
        let token = sign_in_admin(&server).await?;

        let response = server.get("/api/auth/me").authorization_bearer(&token).await;
        response.assert_status_ok();

        let claims: ClaimsResponse = response.json();
        assert_eq!(claims.roles, BTreeSet::from([Role::admin()]));

        let body: serde_json::Value = response.json();
        let mut keys: Vec<&str> = body
            .as_object()
            .map(|object| object.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        assert_eq!(keys, ["accountId", "expiresAt", "issuedAt", "roles"]);
        Ok(())
    }

    #[tokio::test]
    async fn me_requires_token() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let missing = server.get("/api/auth/me").await;
        missing.assert_status_unauthorized();
        let body: serde_json::Value = missing.json();
        assert_eq!(body["name"], "missing_auth_token");

        let forged = server
            .get("/api/auth/me")
            .authorization_bearer("not.a.jwt")
            .await;
        forged.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn role_free_token_reaches_me() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        state.auth_service().sign_up("user1", "p").await?;
        let token = sign_in_token(&server, "user1", "p").await?;

        let response = server.get("/api/auth/me").authorization_bearer(&token).await;
        response.assert_status_ok();

        let claims: ClaimsResponse = response.json();
        assert!(claims.roles.is_empty());
        Ok(())
    }
}
