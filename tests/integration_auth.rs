#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, missing_debug_implementations, unreachable_pub)]
use reqwest::StatusCode;
use serde_json::{Value, json};

mod common;

async fn assert_unauthorized(resp: reqwest::Response) {
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get("www-authenticate").unwrap(), "Basic realm=\"board\"");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_create_needs_no_credentials() {
    let app = common::TestApp::spawn().await;

    let resp = app.create_message("Justin", "JB37@gmail.com", "Test Message").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_credentials() {
    let app = common::TestApp::spawn().await;
    let created = app.create_ok("Justin", "JB37@gmail.com", "Test Message").await;
    let id = created["id"].as_str().unwrap();

    assert_unauthorized(app.client.get(app.message_url(id)).send().await.unwrap()).await;
    assert_unauthorized(app.client.get(app.messages_url()).send().await.unwrap()).await;
    assert_unauthorized(
        app.client.put(app.message_url(id)).json(&json!({ "text": "New-text" })).send().await.unwrap(),
    )
    .await;

    // The rejected update left the message untouched.
    let fetched: Value = app.get_message(id).await.json().await.unwrap();
    assert_eq!(fetched["text"], "Test Message");
}

#[tokio::test]
async fn test_protected_routes_reject_wrong_credentials() {
    let app = common::TestApp::spawn().await;
    let created = app.create_ok("Justin", "JB37@gmail.com", "Test Message").await;
    let id = created["id"].as_str().unwrap();

    let attempts = [("admin", "wrong"), ("Admin", common::PASSWORD), ("", ""), ("admin", "")];
    for (user, pass) in attempts {
        let resp = app.client.get(app.message_url(id)).basic_auth(user, Some(pass)).send().await.unwrap();
        assert_unauthorized(resp).await;

        let resp = app.client.get(app.messages_url()).basic_auth(user, Some(pass)).send().await.unwrap();
        assert_unauthorized(resp).await;
    }
}

#[tokio::test]
async fn test_malformed_authorization_headers() {
    let app = common::TestApp::spawn().await;

    for value in ["Bearer some-token", "Basic", "Basic %%%", "Basic YWRtaW4="] {
        let resp = app.client.get(app.messages_url()).header("Authorization", value).send().await.unwrap();
        assert_unauthorized(resp).await;
    }
}

#[tokio::test]
async fn test_unauthorized_does_not_reveal_existence() {
    let app = common::TestApp::spawn().await;
    let missing = uuid::Uuid::new_v4().to_string();

    assert_unauthorized(app.client.get(app.message_url(&missing)).send().await.unwrap()).await;
    assert_unauthorized(app.client.get(app.message_url("not-a-uuid")).send().await.unwrap()).await;
    assert_unauthorized(app.client.put(app.message_url(&missing)).body("garbage").send().await.unwrap()).await;
}
