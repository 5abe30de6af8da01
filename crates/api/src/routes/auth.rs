//! Authentication route handlers.
//!
//! Registration, login, token refresh, and logout (revocation).

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::auth::AuthService;
use crate::services::token::TokenPair;
use crate::state::AppState;

/// Credentials accepted by `/register` and `/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Handle registration.
///
/// The first account ever registered is created as the admin.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(state.pool(), state.tokens())
        .register(&body.username, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handle login.
///
/// Returns a fresh access token and a non-fresh refresh token. Failed logins
/// are reported as 404 without distinguishing unknown user from bad password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = AuthService::new(state.pool(), state.tokens())
        .login(&body.username, &body.password)
        .await?;

    Ok(Json(pair))
}

/// Mint a new non-fresh access token for the presented (valid) token's user.
pub async fn refresh(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let access_token = AuthService::new(state.pool(), state.tokens())
        .refresh_access_token(user.user_id)
        .await?;

    Ok(Json(json!({ "access_token": access_token })))
}

/// Revoke the presented token.
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    AuthService::new(state.pool(), state.tokens())
        .logout(user.jti, user.expires_at)
        .await?;

    tracing::info!(user_id = %user.user_id, "user logged out");

    Ok(Json(json!({ "message": "successfully logged out" })))
}
