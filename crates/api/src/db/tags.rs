//! Tag repository for database operations, including item/tag links.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storekeeper_core::{ItemId, StoreId, TagId};

use super::RepositoryError;
use crate::models::catalog::Tag;

/// Internal row type for `PostgreSQL` tag queries.
#[derive(Debug, sqlx::FromRow)]
struct TagRow {
    id: i32,
    store_id: i32,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId::new(row.id),
            store_id: StoreId::new(row.store_id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Repository for tag database operations.
pub struct TagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepository<'a> {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tags belonging to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(&self, store_id: StoreId) -> Result<Vec<Tag>, RepositoryError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r"
            SELECT id, store_id, name, created_at
            FROM shop.tag
            WHERE store_id = $1
            ORDER BY id
            ",
        )
        .bind(store_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a tag by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: TagId) -> Result<Option<Tag>, RepositoryError> {
        let row = sqlx::query_as::<_, TagRow>(
            r"
            SELECT id, store_id, name, created_at
            FROM shop.tag
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new tag in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, store_id: StoreId, name: &str) -> Result<Tag, RepositoryError> {
        let row = sqlx::query_as::<_, TagRow>(
            r"
            INSERT INTO shop.tag (store_id, name)
            VALUES ($1, $2)
            RETURNING id, store_id, name, created_at
            ",
        )
        .bind(store_id.as_i32())
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Delete a tag by its ID.
    ///
    /// A tag may only be deleted while it has zero linked items. The check
    /// and the delete run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the tag is still linked to items
    /// (the tag is left untouched).
    /// Returns `RepositoryError::NotFound` if the tag doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: TagId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let linked: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM shop.item_tag WHERE tag_id = $1
            )
            ",
        )
        .bind(id.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        if linked {
            return Err(RepositoryError::Conflict(
                "tag is still associated with items".to_owned(),
            ));
        }

        let result = sqlx::query(
            r"
            DELETE FROM shop.tag
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    /// Link a tag to an item.
    ///
    /// Idempotent: linking an already-linked pair succeeds without error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item or tag doesn't exist
    /// (surfaced as a foreign-key violation).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn link(&self, item_id: ItemId, tag_id: TagId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop.item_tag (item_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (item_id, tag_id) DO NOTHING
            ",
        )
        .bind(item_id.as_i32())
        .bind(tag_id.as_i32())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Unlink a tag from an item.
    ///
    /// Returns `true` if an association was removed, `false` if none existed
    /// (unlinking twice is a no-op, not an error).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn unlink(&self, item_id: ItemId, tag_id: TagId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop.item_tag
            WHERE item_id = $1 AND tag_id = $2
            ",
        )
        .bind(item_id.as_i32())
        .bind(tag_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
