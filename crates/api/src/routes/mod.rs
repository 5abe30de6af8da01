//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check (wired in main)
//! GET  /health/ready               - Readiness check (wired in main)
//!
//! # Auth
//! POST /register                   - Create an account (first account is admin)
//! POST /login                      - Exchange credentials for a token pair
//! POST /refresh                    - Mint a new non-fresh access token   [valid token]
//! POST /logout                     - Revoke the presented token          [valid token]
//!
//! # Users
//! GET    /user/{id}                - Fetch an account                    [valid token]
//! DELETE /user/{id}                - Remove an account                   [fresh + admin]
//!
//! # Stores
//! GET    /store                    - List stores                         [valid token]
//! POST   /store                    - Create a store                      [fresh token]
//! GET    /store/{id}               - Fetch a store                       [valid token]
//! DELETE /store/{id}               - Delete a store                      [fresh + admin]
//!
//! # Items
//! GET    /item                     - List items with their tags          [valid token]
//! POST   /item                     - Create an item                      [fresh token]
//! GET    /item/{id}                - Fetch an item with its tags         [valid token]
//! PUT    /item/{id}                - Upsert an item by id                [fresh token]
//! DELETE /item/{id}                - Delete an item                      [fresh + admin]
//!
//! # Tags
//! GET    /store/{id}/tag           - List a store's tags                 [valid token]
//! POST   /store/{id}/tag           - Create a tag in a store             [fresh token]
//! GET    /tag/{id}                 - Fetch a tag                         [valid token]
//! DELETE /tag/{id}                 - Delete an unlinked tag              [fresh + admin]
//! POST   /item/{id}/tag/{tag_id}   - Link a tag to an item               [fresh token]
//! DELETE /item/{id}/tag/{tag_id}   - Unlink a tag from an item           [fresh + admin]
//! ```

pub mod auth;
pub mod items;
pub mod stores;
pub mod tags;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the application router (public entrypoint used by `main.rs`).
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        // Users
        .route(
            "/user/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        // Stores
        .route("/store", get(stores::list_stores).post(stores::create_store))
        .route(
            "/store/{id}",
            get(stores::get_store).delete(stores::delete_store),
        )
        .route(
            "/store/{id}/tag",
            get(tags::list_store_tags).post(tags::create_store_tag),
        )
        // Items
        .route("/item", get(items::list_items).post(items::create_item))
        .route(
            "/item/{id}",
            get(items::get_item)
                .put(items::upsert_item)
                .delete(items::delete_item),
        )
        .route(
            "/item/{id}/tag/{tag_id}",
            post(tags::link_tag).delete(tags::unlink_tag),
        )
        // Tags
        .route("/tag/{id}", get(tags::get_tag).delete(tags::delete_tag))
}
