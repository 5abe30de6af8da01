//! Integration tests for authentication and the token lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API running (cargo run -p storekeeper-api)
//!
//! Run with: cargo test -p storekeeper-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use storekeeper_integration_tests::{
    TEST_PASSWORD, api_base_url, client, fresh_token, login, register_user, unique_username,
};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_registration_conflicts() {
    let client = client();
    let base_url = api_base_url();
    let username = register_user(&client, "dup").await;

    // Second registration with the same username must be a 409
    let resp = client
        .post(format!("{base_url}/register"))
        .json(&json!({ "username": username, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "user_exists");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_returns_distinct_token_pair() {
    let client = client();
    let username = register_user(&client, "pair").await;
    let tokens = login(&client, &username, TEST_PASSWORD).await;

    let access = tokens["access_token"].as_str().expect("missing access_token");
    let refresh = tokens["refresh_token"]
        .as_str()
        .expect("missing refresh_token");
    assert_ne!(access, refresh);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_with_wrong_password_is_404() {
    let client = client();
    let base_url = api_base_url();
    let username = register_user(&client, "wrongpw").await;

    let resp = client
        .post(format!("{base_url}/login"))
        .json(&json!({ "username": username, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_missing_token_is_unauthorized() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/store"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "authorization_required");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_access_token_is_fresh_but_refresh_token_is_not() {
    let client = client();
    let base_url = api_base_url();
    let username = register_user(&client, "fresh").await;
    let tokens = login(&client, &username, TEST_PASSWORD).await;

    let access = tokens["access_token"].as_str().expect("missing access_token");
    let refresh = tokens["refresh_token"]
        .as_str()
        .expect("missing refresh_token");

    // A fresh-gated mutation succeeds with the access token...
    let resp = client
        .post(format!("{base_url}/store"))
        .bearer_auth(access)
        .json(&json!({ "name": unique_username("store") }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // ...but is rejected with the (non-fresh) refresh token.
    let resp = client
        .post(format!("{base_url}/store"))
        .bearer_auth(refresh)
        .json(&json!({ "name": unique_username("store") }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "fresh_token_required");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_refresh_mints_non_fresh_access_token() {
    let client = client();
    let base_url = api_base_url();
    let username = register_user(&client, "refresh").await;
    let tokens = login(&client, &username, TEST_PASSWORD).await;
    let refresh = tokens["refresh_token"]
        .as_str()
        .expect("missing refresh_token");

    let resp = client
        .post(format!("{base_url}/refresh"))
        .bearer_auth(refresh)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let new_access = body["access_token"].as_str().expect("missing access_token");

    // The minted token authenticates reads...
    let resp = client
        .get(format!("{base_url}/store"))
        .bearer_auth(new_access)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // ...but is not fresh, so sensitive mutations are rejected.
    let resp = client
        .post(format!("{base_url}/store"))
        .bearer_auth(new_access)
        .json(&json!({ "name": unique_username("store") }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_revoked_token_is_rejected_after_logout() {
    let client = client();
    let base_url = api_base_url();
    let token = fresh_token(&client, "logout").await;

    // Token works before logout
    let resp = client
        .get(format!("{base_url}/store"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout revokes the token's jti
    let resp = client
        .post(format!("{base_url}/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // The same token (signature and expiry still valid) is now denied
    let resp = client
        .get(format!("{base_url}/store"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "token_revoked");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_second_logout_is_denied_gracefully() {
    let client = client();
    let base_url = api_base_url();
    let username = register_user(&client, "relogout").await;
    let tokens = login(&client, &username, TEST_PASSWORD).await;
    let access = tokens["access_token"].as_str().expect("missing access_token");

    let resp = client
        .post(format!("{base_url}/logout"))
        .bearer_auth(access)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // A second logout with the now-revoked token is denied at the gate,
    // not an internal error.
    let resp = client
        .post(format!("{base_url}/logout"))
        .bearer_auth(access)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_garbage_token_is_invalid() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/store"))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "invalid_token");
}
