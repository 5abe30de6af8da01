//! User role enum.

use serde::{Deserialize, Serialize};

/// Role attached to a user account.
///
/// The role is read at token-issuance time and embedded in the token as the
/// `is_admin` claim; it is never consulted again until the next issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account; can read and perform fresh-token mutations.
    #[default]
    User,
    /// Elevated account; additionally allowed to delete and unlink.
    Admin,
}

impl UserRole {
    /// Whether this role carries the admin capability.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}
