//! Axum extractors for the two-stage identity gate.

use crate::error::AppError;
use crate::server::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Bearer token extracted from the `Authorization` header.
///
/// Distinguishes the two credential failure tiers: a missing header is
/// Unauthenticated (401), while a header that does not yield a token is
/// Forbidden (403), the same split the verification step uses for bad
/// signatures.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("unauthorized access"))?;

        // The credential is whatever follows the scheme word.
        let token = auth_header
            .split_once(' ')
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::forbidden("forbidden access"))?;

        Ok(Self(token.to_string()))
    }
}

/// Authenticated caller identity.
///
/// Verifies the bearer credential against the configured secret and carries
/// the embedded email claim for downstream authorization checks.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Claimed identity (email) from the verified credential.
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;

        let claims = state
            .signer
            .verify(&bearer.0)
            .map_err(|_| AppError::forbidden("forbidden access"))?;

        Ok(Self {
            email: claims.email,
        })
    }
}

/// Administrator identity.
///
/// The second gate: after authentication, the claimed email is looked up in
/// the user directory and must carry the administrator role. Composed, never
/// standalone.
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    /// The authenticated administrator's email.
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        let is_admin = state
            .users
            .find_by_email(&user.email)
            .await?
            .is_some_and(|record| record.is_admin());

        if !is_admin {
            return Err(AppError::forbidden("forbidden access"));
        }

        Ok(Self { email: user.email })
    }
}
