//! Tag route handlers, including item/tag links.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use storekeeper_core::{ItemId, StoreId, TagId};

use crate::db::RepositoryError;
use crate::db::items::ItemRepository;
use crate::db::stores::StoreRepository;
use crate::db::tags::TagRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, RequireAuth, RequireFreshAuth};
use crate::models::catalog::Tag;
use crate::state::AppState;

/// Body for `POST /store/{id}/tag`.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// List the tags belonging to a store.
pub async fn list_store_tags(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(store_id): Path<i32>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let store_id = StoreId::new(store_id);

    StoreRepository::new(state.pool())
        .get_by_id(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;

    let tags = TagRepository::new(state.pool())
        .list_for_store(store_id)
        .await?;

    Ok(Json(tags))
}

/// Create a tag in a store.
pub async fn create_store_tag(
    State(state): State<AppState>,
    RequireFreshAuth(_user): RequireFreshAuth,
    Path(store_id): Path<i32>,
    Json(body): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("tag name cannot be empty".to_owned()));
    }

    let store_id = StoreId::new(store_id);

    let tag = TagRepository::new(state.pool())
        .create(store_id, name)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("store {store_id}")),
            other => AppError::Database(other),
        })?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Fetch a tag by id.
pub async fn get_tag(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<Tag>, AppError> {
    let tag = TagRepository::new(state.pool())
        .get_by_id(TagId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tag {id}")))?;

    Ok(Json(tag))
}

/// Delete a tag, but only while no items are linked to it.
pub async fn delete_tag(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    TagRepository::new(state.pool())
        .delete(TagId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(msg) => AppError::InvalidState(msg),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "message": "tag deleted" })))
}

/// Link a tag to an item. Linking an already-linked pair is a no-op.
pub async fn link_tag(
    State(state): State<AppState>,
    RequireFreshAuth(_user): RequireFreshAuth,
    Path((item_id, tag_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let item_id = ItemId::new(item_id);
    let tag_id = TagId::new(tag_id);

    ItemRepository::new(state.pool())
        .get_by_id(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {item_id}")))?;

    let tag = TagRepository::new(state.pool())
        .get_by_id(tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tag {tag_id}")))?;

    TagRepository::new(state.pool())
        .link(item_id, tag_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("item or tag no longer exists".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Unlink a tag from an item.
///
/// Removing an association that doesn't exist is a no-op success, so
/// unlinking twice never errors. Returns the refreshed item and the tag.
pub async fn unlink_tag(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path((item_id, tag_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let item_id = ItemId::new(item_id);
    let tag_id = TagId::new(tag_id);

    let tag = TagRepository::new(state.pool())
        .get_by_id(tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tag {tag_id}")))?;

    TagRepository::new(state.pool())
        .unlink(item_id, tag_id)
        .await?;

    let item = ItemRepository::new(state.pool())
        .get_by_id(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {item_id}")))?;

    Ok(Json(json!({
        "message": "tag removed from item",
        "item": item,
        "tag": tag,
    })))
}
