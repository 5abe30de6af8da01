//! User route handlers.
//!
//! The source these routes descend from left them unauthenticated; that was
//! judged an oversight. Reading an account requires a valid token; removing
//! one requires a fresh admin token.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use storekeeper_core::UserId;

use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, RequireAuth};
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Fetch an account by id.
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<User>, AppError> {
    let user = AuthService::new(state.pool(), state.tokens())
        .get_user(UserId::new(id))
        .await?;

    Ok(Json(user))
}

/// Remove an account.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    AuthService::new(state.pool(), state.tokens())
        .delete_user(UserId::new(id))
        .await?;

    tracing::info!(user_id = id, deleted_by = %admin.user_id, "user deleted");

    Ok(Json(json!({ "message": "user deleted" })))
}
