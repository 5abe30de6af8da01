//! Database operations for the storekeeper `PostgreSQL` database.
//!
//! # Schema: `shop`
//!
//! ## Tables
//!
//! - `app_user` - Accounts (username, Argon2id password hash, role)
//! - `revoked_token` - Append-only token revocation list keyed by `jti`
//! - `store` - Stores (unique name)
//! - `item` - Items, owned by a store
//! - `tag` - Tags, owned by a store
//! - `item_tag` - Many-to-many item/tag association
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and applied at startup
//! via `sqlx::migrate!`.
//!
//! # Queries
//!
//! Queries use the runtime-checked sqlx API with `FromRow` row types and
//! explicit `TryFrom` conversions into domain types, so the crate builds
//! without a live database.

pub mod items;
pub mod revoked_tokens;
pub mod stores;
pub mod tags;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use items::ItemRepository;
pub use revoked_tokens::RevokedTokenRepository;
pub use stores::StoreRepository;
pub use tags::TagRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique store name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
