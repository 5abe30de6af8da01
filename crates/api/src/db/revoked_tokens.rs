//! Revocation registry: append-only storage of revoked token ids.
//!
//! Revoked tokens are tracked by their `jti` claim. A row carries the token's
//! own expiry so that records can be purged once the token would have expired
//! anyway; until then the registry is strictly append-only.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;

/// Repository for the token revocation list.
pub struct RevokedTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RevokedTokenRepository<'a> {
    /// Create a new revoked-token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mark a token id as revoked.
    ///
    /// Idempotent: revoking an already-revoked `jti` succeeds without error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn revoke(
        &self,
        jti: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop.revoked_token (jti, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (jti) DO NOTHING
            ",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Check whether a token id has been revoked.
    ///
    /// Consulted by the authorization gate on every authenticated request;
    /// callers must treat an `Err` as a denial (fail closed).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the lookup fails.
    pub async fn is_revoked(&self, jti: Uuid) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM shop.revoked_token WHERE jti = $1
            )
            ",
        )
        .bind(jti)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Delete revocation records for tokens that have already expired.
    ///
    /// An expired token is rejected by signature validation regardless of the
    /// registry, so its record carries no information anymore. Returns the
    /// number of records deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop.revoked_token
            WHERE expires_at < now()
            ",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
