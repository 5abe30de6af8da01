//! Store route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use storekeeper_core::StoreId;

use crate::db::stores::StoreRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, RequireAuth, RequireFreshAuth};
use crate::models::catalog::Store;
use crate::state::AppState;

/// Body for `POST /store`.
#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub name: String,
}

/// List all stores.
pub async fn list_stores(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = StoreRepository::new(state.pool()).list().await?;
    Ok(Json(stores))
}

/// Fetch a store by id.
pub async fn get_store(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<Store>, AppError> {
    let store = StoreRepository::new(state.pool())
        .get_by_id(StoreId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;

    Ok(Json(store))
}

/// Create a store.
///
/// Duplicate names surface as 409; uniqueness is enforced by the database
/// constraint rather than a check-then-insert.
pub async fn create_store(
    State(state): State<AppState>,
    RequireFreshAuth(_user): RequireFreshAuth,
    Json(body): Json<CreateStoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("store name cannot be empty".to_owned()));
    }

    let store = StoreRepository::new(state.pool()).create(name).await?;

    Ok((StatusCode::CREATED, Json(store)))
}

/// Delete a store and, by cascade, its items and tags.
pub async fn delete_store(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    StoreRepository::new(state.pool())
        .delete(StoreId::new(id))
        .await?;

    Ok(Json(json!({ "message": "store deleted" })))
}
