//! Account administration handlers.
//!
//! Every route here sits behind the administrator role requirement; the caller's
//! claims are only used to attribute changes in the logs.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use fridge_store::types::{AccountStatus, Role};

use crate::extract::{AuthState, Json, Path, ValidateJson};
use crate::handler::Result;
use crate::handler::request::{AccountPathParams, UpdateProfile};
use crate::handler::response::Account;
use crate::service::{ServiceState, UserService};

/// Tracing target for account administration operations.
const TRACING_TARGET: &str = "fridge_server::handler::users";

/// Lists all accounts.
#[tracing::instrument(skip_all)]
async fn list_users(
    State(user_service): State<UserService>,
) -> Result<(StatusCode, Json<Vec<Account>>)> {
    let accounts = user_service.list_all().await?;
    Ok((StatusCode::OK, Json(Account::from_models(accounts))))
}

/// Returns a single account.
#[tracing::instrument(skip_all)]
async fn get_user(
    State(user_service): State<UserService>,
    Path(path_params): Path<AccountPathParams>,
) -> Result<(StatusCode, Json<Account>)> {
    let account = user_service.find_by_id(path_params.account_id).await?;
    Ok((StatusCode::OK, Json(Account::from_model(account))))
}

/// Blocks an account from signing in.
#[tracing::instrument(skip_all)]
async fn block_user(
    State(user_service): State<UserService>,
    AuthState(auth_claims): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<StatusCode> {
    user_service
        .change_status(path_params.account_id, AccountStatus::Blocked)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        actor_id = %auth_claims.account_id,
        account_id = %path_params.account_id,
        "account blocked"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Lets a blocked account sign in again.
#[tracing::instrument(skip_all)]
async fn unblock_user(
    State(user_service): State<UserService>,
    AuthState(auth_claims): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<StatusCode> {
    user_service
        .change_status(path_params.account_id, AccountStatus::Active)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        actor_id = %auth_claims.account_id,
        account_id = %path_params.account_id,
        "account unblocked"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Grants the administrator role.
///
/// Tokens issued before the grant keep their old role snapshot.
#[tracing::instrument(skip_all)]
async fn add_admin(
    State(user_service): State<UserService>,
    AuthState(auth_claims): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<StatusCode> {
    user_service
        .add_role(path_params.account_id, Role::admin())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        actor_id = %auth_claims.account_id,
        account_id = %path_params.account_id,
        "administrator role granted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Revokes the administrator role.
#[tracing::instrument(skip_all)]
async fn remove_admin(
    State(user_service): State<UserService>,
    AuthState(auth_claims): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<StatusCode> {
    user_service
        .remove_role(path_params.account_id, Role::admin())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        actor_id = %auth_claims.account_id,
        account_id = %path_params.account_id,
        "administrator role revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Updates the username and/or password of an account.
#[tracing::instrument(skip_all)]
async fn update_user(
    State(user_service): State<UserService>,
    AuthState(auth_claims): AuthState,
    Path(path_params): Path<AccountPathParams>,
    ValidateJson(request): ValidateJson<UpdateProfile>,
) -> Result<StatusCode> {
    user_service
        .update_profile(path_params.account_id, request.into_update())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        actor_id = %auth_claims.account_id,
        account_id = %path_params.account_id,
        "account profile updated"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns routes for account administration.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{accountId}", get(get_user).patch(update_user))
        .route("/api/users/{accountId}/block", patch(block_user))
        .route("/api/users/{accountId}/unblock", patch(unblock_user))
        .route("/api/users/{accountId}/add-admin", patch(add_admin))
        .route("/api/users/{accountId}/remove-admin", patch(remove_admin))
}
