//! Request middleware for the API.
//!
//! Authentication is expressed as extractors rather than layered middleware:
//! each handler states its requirement (`RequireAuth`, `RequireFreshAuth`,
//! `RequireAdminAuth`) in its signature.

pub mod auth;

pub use auth::{AuthRejection, AuthUser, RequireAdminAuth, RequireAuth, RequireFreshAuth};
