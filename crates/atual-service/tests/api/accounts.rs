use crate::common::server_utils::create_test_server;
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_ai_provider_key_is_never_returned() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/ai-providers")
        .json(&json!({ "name": "openai", "api_key": "sk-secret", "model": "gpt-4o" }))
        .await;
    response.assert_status_ok();
    assert!(!response.text().contains("sk-secret"));

    let body: Value = server.get("/api/ai-providers").await.json();
    let providers = body["data"].as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["has_api_key"], json!(true));
    assert_eq!(providers[0]["status"], json!("offline"));
    assert!(providers[0].get("api_key").is_none());

    Ok(())
}

#[tokio::test]
async fn test_activating_a_provider_deactivates_the_rest() -> Result<()> {
    let (server, _db) = create_test_server();

    for name in ["openai", "gemini", "claude"] {
        server
            .post("/api/ai-providers")
            .json(&json!({ "name": name, "is_active": true }))
            .await
            .assert_status_ok();
    }

    let body: Value = server.get("/api/ai-providers").await.json();
    let active: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|provider| provider["is_active"] == json!(true))
        .map(|provider| provider["name"].as_str().unwrap())
        .collect();
    assert_eq!(active, vec!["claude"]);

    Ok(())
}

#[tokio::test]
async fn test_provider_upsert_keeps_unsent_fields() -> Result<()> {
    let (server, _db) = create_test_server();

    server
        .post("/api/ai-providers")
        .json(&json!({ "name": "gemini", "api_key": "key-1", "model": "gemini-pro" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/ai-providers")
        .json(&json!({ "name": "gemini", "model": "gemini-flash" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["model"], json!("gemini-flash"));
    assert_eq!(body["data"]["has_api_key"], json!(true));

    let body: Value = server.get("/api/ai-providers").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    server
        .post("/api/ai-providers")
        .json(&json!({ "model": "no-name" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_social_accounts_upsert_by_platform() -> Result<()> {
    let (server, _db) = create_test_server();

    server
        .post("/api/social-accounts")
        .json(&json!({ "platform": "telegram", "account_name": "@atualbot" }))
        .await
        .assert_status_ok();

    let body: Value = server.get("/api/social-accounts").await.json();
    assert_eq!(body["data"][0]["has_credentials"], json!(false));

    let response = server
        .post("/api/social-accounts")
        .json(&json!({ "platform": "telegram", "api_key": "123:abc" }))
        .await;
    response.assert_status_ok();
    assert!(!response.text().contains("123:abc"));

    let body: Value = server.get("/api/social-accounts").await.json();
    let accounts = body["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["account_name"], json!("@atualbot"));
    assert_eq!(accounts[0]["has_credentials"], json!(true));

    server
        .post("/api/social-accounts")
        .json(&json!({ "account_name": "orphan" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}
