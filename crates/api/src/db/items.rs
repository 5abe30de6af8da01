//! Item repository for database operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use storekeeper_core::{ItemId, StoreId, TagId};

use super::RepositoryError;
use crate::models::catalog::{Item, ItemWithTags, Tag};

/// Internal row type for `PostgreSQL` item queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i32,
    store_id: i32,
    name: String,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ItemId::new(row.id),
            store_id: StoreId::new(row.store_id),
            name: row.name,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for tags joined through the association table.
#[derive(Debug, sqlx::FromRow)]
struct LinkedTagRow {
    item_id: i32,
    id: i32,
    store_id: i32,
    name: String,
    created_at: DateTime<Utc>,
}

impl LinkedTagRow {
    fn into_tag(self) -> Tag {
        Tag {
            id: TagId::new(self.id),
            store_id: StoreId::new(self.store_id),
            name: self.name,
            created_at: self.created_at,
        }
    }
}

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all items with their linked tags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<ItemWithTags>, RepositoryError> {
        let items = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, store_id, name, price, created_at
            FROM shop.item
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let tag_rows = sqlx::query_as::<_, LinkedTagRow>(
            r"
            SELECT it.item_id, t.id, t.store_id, t.name, t.created_at
            FROM shop.item_tag it
            JOIN shop.tag t ON t.id = it.tag_id
            ORDER BY it.item_id, t.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut tags_by_item: HashMap<i32, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags_by_item
                .entry(row.item_id)
                .or_default()
                .push(row.into_tag());
        }

        Ok(items
            .into_iter()
            .map(|row| {
                let tags = tags_by_item.remove(&row.id).unwrap_or_default();
                ItemWithTags {
                    item: row.into(),
                    tags,
                }
            })
            .collect())
    }

    /// Get an item by its ID, with its linked tags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: ItemId) -> Result<Option<ItemWithTags>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, store_id, name, price, created_at
            FROM shop.item
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tags = self.tags_for_item(id).await?;

        Ok(Some(ItemWithTags {
            item: row.into(),
            tags,
        }))
    }

    /// Create a new item in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// missing store, surfaced as a foreign-key violation).
    pub async fn create(
        &self,
        store_id: StoreId,
        name: &str,
        price: Decimal,
    ) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            INSERT INTO shop.item (store_id, name, price)
            VALUES ($1, $2, $3)
            RETURNING id, store_id, name, price, created_at
            ",
        )
        .bind(store_id.as_i32())
        .bind(name)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite an existing item's name and price.
    ///
    /// Returns `None` if no item with this ID exists (the caller decides
    /// whether to fall through to [`Self::insert_with_id`]).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ItemId,
        name: &str,
        price: Decimal,
    ) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            UPDATE shop.item
            SET name = $2, price = $3
            WHERE id = $1
            RETURNING id, store_id, name, price, created_at
            ",
        )
        .bind(id.as_i32())
        .bind(name)
        .bind(price)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create an item with a client-supplied ID (upsert create path).
    ///
    /// `ON CONFLICT` makes this race-safe against a concurrent create with
    /// the same ID: the losing writer degrades to an update of name/price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// missing store, surfaced as a foreign-key violation).
    pub async fn insert_with_id(
        &self,
        id: ItemId,
        store_id: StoreId,
        name: &str,
        price: Decimal,
    ) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            INSERT INTO shop.item (id, store_id, name, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, price = EXCLUDED.price
            RETURNING id, store_id, name, price, created_at
            ",
        )
        .bind(id.as_i32())
        .bind(store_id.as_i32())
        .bind(name)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete an item by its ID.
    ///
    /// Cascade-deletes its tag associations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop.item
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Get the tags currently linked to an item.
    async fn tags_for_item(&self, id: ItemId) -> Result<Vec<Tag>, RepositoryError> {
        let rows = sqlx::query_as::<_, LinkedTagRow>(
            r"
            SELECT it.item_id, t.id, t.store_id, t.name, t.created_at
            FROM shop.item_tag it
            JOIN shop.tag t ON t.id = it.tag_id
            WHERE it.item_id = $1
            ORDER BY t.id
            ",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(LinkedTagRow::into_tag).collect())
    }
}
