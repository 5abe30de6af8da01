//! Integration tests for the catalog: stores, items, tags, and links.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API running (cargo run -p storekeeper-api)
//! - Admin credentials for the deletion tests (see crate docs)
//!
//! Run with: cargo test -p storekeeper-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use storekeeper_integration_tests::{
    admin_token, api_base_url, client, fresh_token, unique_username,
};

/// Test helper: create a store and return its JSON.
async fn create_store(client: &Client, token: &str) -> Value {
    let resp = client
        .post(format!("{}/store", api_base_url()))
        .bearer_auth(token)
        .json(&json!({ "name": unique_username("store") }))
        .send()
        .await
        .expect("Failed to create store");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse store")
}

/// Test helper: create an item in a store and return its JSON.
async fn create_item(client: &Client, token: &str, store_id: i64) -> Value {
    let resp = client
        .post(format!("{}/item", api_base_url()))
        .bearer_auth(token)
        .json(&json!({ "name": "chair", "price": "49.99", "store_id": store_id }))
        .send()
        .await
        .expect("Failed to create item");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse item")
}

/// Test helper: create a tag in a store and return its JSON.
async fn create_tag(client: &Client, token: &str, store_id: i64) -> Value {
    let resp = client
        .post(format!("{}/store/{store_id}/tag", api_base_url()))
        .bearer_auth(token)
        .json(&json!({ "name": "furniture" }))
        .send()
        .await
        .expect("Failed to create tag");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse tag")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_store_name_conflict() {
    let client = client();
    let base_url = api_base_url();
    let token = fresh_token(&client, "storeconf").await;

    let store = create_store(&client, &token).await;
    let name = store["name"].as_str().expect("missing name");

    let resp = client
        .post(format!("{base_url}/store"))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_store_fetch_and_list() {
    let client = client();
    let base_url = api_base_url();
    let token = fresh_token(&client, "storeget").await;

    let store = create_store(&client, &token).await;
    let store_id = store["id"].as_i64().expect("missing id");

    let resp = client
        .get(format!("{base_url}/store/{store_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(fetched["name"], store["name"]);

    let resp = client
        .get(format!("{base_url}/store"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let stores: Vec<Value> = resp.json().await.expect("Failed to parse body");
    assert!(stores.iter().any(|s| s["id"] == store["id"]));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_item_upsert_creates_then_overwrites() {
    let client = client();
    let base_url = api_base_url();
    let token = fresh_token(&client, "upsert").await;

    let store = create_store(&client, &token).await;
    let store_id = store["id"].as_i64().expect("missing id");

    // Pick an id far away from the identity sequence
    let item_id = 2_000_000 + i64::from(rand_suffix());

    // PUT on a nonexistent id creates the item with that id
    let resp = client
        .put(format!("{base_url}/item/{item_id}"))
        .bearer_auth(&token)
        .json(&json!({ "name": "lamp", "price": "10.00", "store_id": store_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(created["id"].as_i64(), Some(item_id));
    assert_eq!(created["name"], "lamp");

    // PUT on the existing id overwrites name and price only
    let resp = client
        .put(format!("{base_url}/item/{item_id}"))
        .bearer_auth(&token)
        .json(&json!({ "name": "desk lamp", "price": "12.50" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(updated["id"].as_i64(), Some(item_id));
    assert_eq!(updated["name"], "desk lamp");
    assert_eq!(updated["price"], "12.50");
    assert_eq!(updated["store_id"], created["store_id"]);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_item_upsert_create_requires_store_id() {
    let client = client();
    let base_url = api_base_url();
    let token = fresh_token(&client, "upsertbad").await;

    let item_id = 3_000_000 + i64::from(rand_suffix());

    let resp = client
        .put(format!("{base_url}/item/{item_id}"))
        .bearer_auth(&token)
        .json(&json!({ "name": "orphan", "price": "1.00" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_tag_deletion_guarded_by_links() {
    let client = client();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let store = create_store(&client, &admin).await;
    let store_id = store["id"].as_i64().expect("missing id");
    let item = create_item(&client, &admin, store_id).await;
    let item_id = item["id"].as_i64().expect("missing id");
    let tag = create_tag(&client, &admin, store_id).await;
    let tag_id = tag["id"].as_i64().expect("missing id");

    // Link tag to item
    let resp = client
        .post(format!("{base_url}/item/{item_id}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Deleting a linked tag fails with invalid-state and the tag remains
    let resp = client
        .delete(format!("{base_url}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "invalid_state");

    let resp = client
        .get(format!("{base_url}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // Unlink; a second unlink is a no-op, not an error
    let resp = client
        .delete(format!("{base_url}/item/{item_id}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{base_url}/item/{item_id}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // With zero linked items the tag can be deleted
    let resp = client
        .delete(format!("{base_url}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_item_list_includes_linked_tags() {
    let client = client();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let store = create_store(&client, &admin).await;
    let store_id = store["id"].as_i64().expect("missing id");
    let item = create_item(&client, &admin, store_id).await;
    let item_id = item["id"].as_i64().expect("missing id");
    let tag = create_tag(&client, &admin, store_id).await;
    let tag_id = tag["id"].as_i64().expect("missing id");

    let resp = client
        .post(format!("{base_url}/item/{item_id}/tag/{tag_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base_url}/item/{item_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.expect("Failed to parse body");
    let tags = fetched["tags"].as_array().expect("missing tags");
    assert!(tags.iter().any(|t| t["id"].as_i64() == Some(tag_id)));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_requires_admin() {
    let client = client();
    let base_url = api_base_url();

    // A non-first registration is a regular user
    let token = fresh_token(&client, "notadmin").await;
    let store = create_store(&client, &token).await;
    let store_id = store["id"].as_i64().expect("missing id");

    let resp = client
        .delete(format!("{base_url}/store/{store_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "admin_required");
}

/// Small pseudo-random suffix derived from the process-unique uuid helper.
fn rand_suffix() -> u32 {
    let id = uuid::Uuid::new_v4();
    u32::from(id.as_bytes()[0]) * 256 + u32::from(id.as_bytes()[1])
}
