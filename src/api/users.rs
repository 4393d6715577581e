//! User accounts, credential issuance, and role administration.
//!
//! The authorization tiers here are deliberately asymmetric: creating and
//! listing users and checking admin status are public, while elevation is
//! doubly gated. The frontend depends on the public tier during its login
//! pass-through, so it is not tightened here.

use crate::auth::RequireAdmin;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::{User, UserId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string carrying an email key.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    /// Email to issue a credential for.
    pub email: String,
}

/// Credential issuance response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Bearer credential, empty when issuance is refused.
    pub access_token: String,
}

/// Issue a bearer credential for a registered email.
///
/// Issuance is gated on registration: an email with no matching user record
/// gets 403 and an empty token, never a credential.
pub async fn issue_token(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Response, AppError> {
    let user = state.users.find_by_email(&query.email).await?;

    if user.is_none() {
        return Ok((
            StatusCode::FORBIDDEN,
            Json(TokenResponse {
                access_token: String::new(),
            }),
        )
            .into_response());
    }

    let access_token = state.signer.issue(&query.email);

    Ok(Json(TokenResponse { access_token }).into_response())
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Email, the natural key.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
}

/// Registration acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    /// Whether the record was persisted.
    pub acknowledged: bool,
    /// Identity of the persisted record.
    pub inserted_id: UserId,
}

/// Register a user (public; happens on first login pass-through).
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<InsertAck>, AppError> {
    let user = User::new(request.email, request.name);
    state.users.insert(&user).await?;

    Ok(Json(InsertAck {
        acknowledged: true,
        inserted_id: user.id,
    }))
}

/// List all users (public, used by the admin dashboard).
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list().await?))
}

/// Admin status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    /// Whether the email carries the administrator role.
    pub is_admin: bool,
}

/// Check whether an email is an administrator (public).
pub async fn admin_status(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, AppError> {
    let is_admin = state
        .users
        .find_by_email(&email)
        .await?
        .is_some_and(|user| user.is_admin());

    Ok(Json(AdminStatus { is_admin }))
}

/// Elevation acknowledgement.
#[derive(Debug, Serialize)]
pub struct ElevateAck {
    /// Always true on success; re-elevating an administrator is a no-op
    /// success.
    pub acknowledged: bool,
}

/// Elevate a user to administrator.
///
/// Doubly gated: authenticated and administrator. Idempotent, and additive
/// only; there is no demotion path.
pub async fn grant_admin(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ElevateAck>, AppError> {
    let user_id = UserId::from_uuid(id);
    let updated = state.users.grant_admin(user_id).await?;

    if !updated {
        return Err(AppError::not_found("User", user_id));
    }

    tracing::info!(user_id = %user_id, granted_by = %admin.email, "Administrator role granted");

    Ok(Json(ElevateAck { acknowledged: true }))
}
