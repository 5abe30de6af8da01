//! Integration tests for Storekeeper.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and the API
//! docker compose up -d postgres
//! cargo run -p storekeeper-api
//!
//! # Run integration tests
//! cargo test -p storekeeper-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREKEEPER_BASE_URL` - API base URL (default: `http://localhost:3000`)
//! - `STOREKEEPER_TEST_ADMIN_USERNAME` / `STOREKEEPER_TEST_ADMIN_PASSWORD` -
//!   Credentials of an admin account. On a fresh database the suite falls
//!   back to registering one itself (the first account registered becomes
//!   the admin).

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("STOREKEEPER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client for tests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Generate a username that won't collide across test runs.
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    // Usernames are capped at 64 chars; 12 hex chars is plenty of entropy.
    format!("{prefix}-{}", suffix.get(..12).unwrap_or(&suffix))
}

/// Test password used for every throwaway account.
pub const TEST_PASSWORD: &str = "integration-test-password";

/// Register a throwaway account and return its username.
///
/// # Panics
///
/// Panics if the request fails or the API rejects the registration.
pub async fn register_user(client: &Client, prefix: &str) -> String {
    let username = unique_username(prefix);
    let resp = client
        .post(format!("{}/register", api_base_url()))
        .json(&json!({ "username": username, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    username
}

/// Login and return the `{access_token, refresh_token}` payload.
///
/// # Panics
///
/// Panics if the request fails or the credentials are rejected.
pub async fn login(client: &Client, username: &str, password: &str) -> Value {
    let resp = client
        .post(format!("{}/login", api_base_url()))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    resp.json().await.expect("Failed to parse login response")
}

/// Register a fresh account and return its fresh access token.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn fresh_token(client: &Client, prefix: &str) -> String {
    let username = register_user(client, prefix).await;
    let tokens = login(client, &username, TEST_PASSWORD).await;
    tokens["access_token"]
        .as_str()
        .expect("missing access_token")
        .to_string()
}

/// Get a fresh access token for an admin account.
///
/// Uses `STOREKEEPER_TEST_ADMIN_USERNAME`/`STOREKEEPER_TEST_ADMIN_PASSWORD`
/// when set; otherwise registers an account and assumes a fresh database
/// (where the first registration becomes the admin).
///
/// # Panics
///
/// Panics if login fails.
pub async fn admin_token(client: &Client) -> String {
    let (username, password) = match (
        std::env::var("STOREKEEPER_TEST_ADMIN_USERNAME"),
        std::env::var("STOREKEEPER_TEST_ADMIN_PASSWORD"),
    ) {
        (Ok(u), Ok(p)) => (u, p),
        _ => {
            let username = register_user(client, "admin").await;
            (username, TEST_PASSWORD.to_string())
        }
    };

    let tokens = login(client, &username, &password).await;
    tokens["access_token"]
        .as_str()
        .expect("missing access_token")
        .to_string()
}
