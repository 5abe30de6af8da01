//! Authentication extractors: the authorization gate.
//!
//! Every authenticated request passes through the same decision sequence:
//!
//! 1. Extract the bearer token; absence is a denial.
//! 2. Decode and validate the signature/expiry.
//! 3. Consult the revocation registry by `jti`. A registry failure denies
//!    the request (fail closed) - a token is never accepted just because
//!    its revocation status could not be determined.
//! 4. (`RequireFreshAuth`) the token must be fresh.
//! 5. (`RequireAdminAuth`) the token must be fresh and carry the admin claim.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn delete_store(
//!     State(state): State<AppState>,
//!     RequireAdminAuth(admin): RequireAdminAuth,
//!     Path(store_id): Path<i32>,
//! ) -> Result<Json<Value>, AppError> { ... }
//! ```

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use storekeeper_core::UserId;

use crate::db::revoked_tokens::RevokedTokenRepository;
use crate::services::token::TokenError;
use crate::state::AppState;

/// The authenticated caller, as forwarded to handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Subject of the presented token.
    pub user_id: UserId,
    /// Unique id of the presented token.
    pub jti: Uuid,
    /// Whether the token was minted directly from a login.
    pub fresh: bool,
    /// Admin claim embedded at issuance.
    pub is_admin: bool,
    /// When the presented token expires.
    pub expires_at: DateTime<Utc>,
}

/// Error returned when a request fails the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No bearer token in the Authorization header.
    MissingToken,
    /// Malformed token or bad signature.
    InvalidToken,
    /// Token is past its expiry.
    ExpiredToken,
    /// Token id is on the revocation list.
    RevokedToken,
    /// Route requires a fresh token but the presented one is not.
    StaleToken,
    /// Route requires the admin claim.
    AdminRequired,
    /// The revocation registry could not be consulted; deny rather than
    /// silently allowing access.
    RevocationUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "authorization_required",
                "request does not contain an authorization token",
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "signature verification failed",
            ),
            Self::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "token has expired",
            ),
            Self::RevokedToken => (
                StatusCode::UNAUTHORIZED,
                "token_revoked",
                "token has been revoked",
            ),
            Self::StaleToken => (
                StatusCode::UNAUTHORIZED,
                "fresh_token_required",
                "the token is not fresh",
            ),
            Self::AdminRequired => (
                StatusCode::UNAUTHORIZED,
                "admin_required",
                "admin privilege required",
            ),
            Self::RevocationUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "revocation_check_failed",
                "token revocation status could not be verified",
            ),
        };

        (status, Json(json!({"error": code, "message": message}))).into_response()
    }
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?;

    let header = header.to_str().map_err(|_| AuthRejection::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthRejection::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthRejection::MissingToken);
    }

    Ok(token)
}

/// Extractor that requires a valid, non-revoked token.
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = bearer_token(&parts.headers)?;

        let claims = state.tokens().decode(token).map_err(|e| match e {
            TokenError::Expired => AuthRejection::ExpiredToken,
            TokenError::Invalid | TokenError::Signing => AuthRejection::InvalidToken,
        })?;

        let user_id = claims.user_id().ok_or(AuthRejection::InvalidToken)?;

        let revoked = RevokedTokenRepository::new(state.pool())
            .is_revoked(claims.jti)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "revocation check failed; denying request");
                AuthRejection::RevocationUnavailable
            })?;

        if revoked {
            return Err(AuthRejection::RevokedToken);
        }

        Ok(Self(AuthUser {
            user_id,
            jti: claims.jti,
            fresh: claims.fresh,
            is_admin: claims.is_admin,
            expires_at: claims.expires_at(),
        }))
    }
}

/// Extractor that additionally requires the token to be fresh.
///
/// Sensitive mutations (create, update, delete) demand a token minted
/// directly from a login, not one minted via refresh.
pub struct RequireFreshAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireFreshAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.fresh {
            return Err(AuthRejection::StaleToken);
        }

        Ok(Self(user))
    }
}

/// Extractor that requires a fresh token carrying the admin claim.
pub struct RequireAdminAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireFreshAuth(user) = RequireFreshAuth::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(AuthRejection::AdminRequired);
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with_authorization("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthRejection::MissingToken));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with_authorization("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), Err(AuthRejection::MissingToken));
    }

    #[test]
    fn test_bearer_token_empty() {
        let headers = headers_with_authorization("Bearer   ");
        assert_eq!(bearer_token(&headers), Err(AuthRejection::MissingToken));
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::StaleToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::AdminRequired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::RevocationUnavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
