//! Domain types for the storekeeper API.
//!
//! These types represent validated domain objects separate from database
//! row types; conversions from rows live next to the queries in [`crate::db`].

pub mod catalog;
pub mod user;

pub use catalog::{Item, ItemWithTags, Store, Tag};
pub use user::User;
