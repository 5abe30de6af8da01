//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeeper_core::{UserId, UserRole, Username};

/// A registered account (domain type).
///
/// The password hash never leaves the repository layer; handlers only ever
/// see this type.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique and lowercased.
    pub username: Username,
    /// Role consulted at token-issuance time.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
