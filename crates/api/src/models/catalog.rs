//! Catalog domain types: stores, items, and tags.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use storekeeper_core::{ItemId, StoreId, TagId};

/// A store (domain type). Owns items and tags.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name, unique across all stores.
    pub name: String,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
}

/// An item for sale (domain type). Belongs to exactly one store.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Store this item belongs to.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Price, serialized as a decimal string.
    pub price: Decimal,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

/// A tag (domain type). Belongs to one store; linked to items cross-store.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    /// Unique tag ID.
    pub id: TagId,
    /// Store this tag belongs to.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
}

/// An item together with its linked tags, as returned by the item routes.
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithTags {
    /// The item itself.
    #[serde(flatten)]
    pub item: Item,
    /// Tags currently linked to the item.
    pub tags: Vec<Tag>,
}
