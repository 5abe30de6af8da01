//! Item route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use storekeeper_core::{ItemId, StoreId};

use crate::db::items::ItemRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, RequireAuth, RequireFreshAuth};
use crate::models::catalog::{Item, ItemWithTags};
use crate::state::AppState;

/// Body for `POST /item`.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub price: Decimal,
    pub store_id: i32,
}

/// Body for `PUT /item/{id}`.
///
/// `store_id` is only consulted on the create half of the upsert; updates
/// never move an item between stores.
#[derive(Debug, Deserialize)]
pub struct UpsertItemRequest {
    pub name: String,
    pub price: Decimal,
    pub store_id: Option<i32>,
}

/// List all items with their linked tags.
pub async fn list_items(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<ItemWithTags>>, AppError> {
    let items = ItemRepository::new(state.pool()).list().await?;
    Ok(Json(items))
}

/// Fetch an item by id, with its linked tags.
pub async fn get_item(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<ItemWithTags>, AppError> {
    let item = ItemRepository::new(state.pool())
        .get_by_id(ItemId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))?;

    Ok(Json(item))
}

/// Create an item in a store.
pub async fn create_item(
    State(state): State<AppState>,
    RequireFreshAuth(_user): RequireFreshAuth,
    Json(body): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("item name cannot be empty".to_owned()));
    }

    let item = ItemRepository::new(state.pool())
        .create(StoreId::new(body.store_id), name, body.price)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Upsert an item by id.
///
/// If the item exists its name and price are overwritten; if it doesn't,
/// it is created with exactly this id. The create path needs a `store_id`
/// in the body.
pub async fn upsert_item(
    State(state): State<AppState>,
    RequireFreshAuth(_user): RequireFreshAuth,
    Path(id): Path<i32>,
    Json(body): Json<UpsertItemRequest>,
) -> Result<Json<Item>, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("item name cannot be empty".to_owned()));
    }

    let repo = ItemRepository::new(state.pool());
    let id = ItemId::new(id);

    if let Some(item) = repo.update(id, name, body.price).await? {
        return Ok(Json(item));
    }

    let Some(store_id) = body.store_id else {
        return Err(AppError::BadRequest(
            "store_id is required when creating an item via PUT".to_owned(),
        ));
    };

    let item = repo
        .insert_with_id(id, StoreId::new(store_id), name, body.price)
        .await?;

    Ok(Json(item))
}

/// Delete an item.
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    ItemRepository::new(state.pool())
        .delete(ItemId::new(id))
        .await?;

    Ok(Json(json!({ "message": "item deleted" })))
}
