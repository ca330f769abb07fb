// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential lifecycle against a mock Spotify token endpoint.
//!
//! Each mock carries an exact call count, verified when the server drops.

mod common;

use common::{config_for, credentials, now_ms, seed, stored};
use keyboard_api::config::Config;
use keyboard_api::db::{CredentialStore, MemoryCredentialStore};
use keyboard_api::error::AppError;
use keyboard_api::services::{CredentialManager, TokenExchangeClient};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("test_client_id:test_secret")
const BASIC_AUTH: &str = "Basic dGVzdF9jbGllbnRfaWQ6dGVzdF9zZWNyZXQ=";

fn manager(config: &Config, store: &MemoryCredentialStore) -> CredentialManager {
    CredentialManager::new(
        Arc::new(store.clone()),
        TokenExchangeClient::new(reqwest::Client::new(), config),
    )
}

async fn setup() -> (MockServer, CredentialManager, MemoryCredentialStore) {
    let server = MockServer::start().await;
    let store = MemoryCredentialStore::new();
    let manager = manager(&config_for(&server.uri()), &store);
    (server, manager, store)
}

#[tokio::test]
async fn test_fresh_token_makes_no_network_call() {
    let (server, manager, store) = setup().await;
    seed(&store, "alice", &credentials("A1", "R1", 60_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let token = manager.ensure_valid_access_token("alice").await.unwrap();
    assert_eq!(token, "A1");
}

#[tokio::test]
async fn test_token_inside_buffer_is_refreshed() {
    let (server, manager, store) = setup().await;
    // Still valid for 2s, which is inside the 5s look-ahead
    seed(&store, "alice", &credentials("A1", "R1", 2_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.ensure_valid_access_token("alice").await.unwrap();
    assert_eq!(token, "A2");
}

#[tokio::test]
async fn test_stale_token_refreshes_once_and_keeps_refresh_token() {
    let (server, manager, store) = setup().await;
    seed(&store, "alice", &credentials("A1", "R1", -1_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "user-read-playback-state"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let before = now_ms();
    let token = manager.ensure_valid_access_token("alice").await.unwrap();
    assert_eq!(token, "A2");

    let saved = stored(&store, "alice").await.unwrap();
    assert_eq!(saved.access_token, "A2");
    assert_eq!(saved.refresh_token, "R1");
    assert_eq!(saved.expires_in, 3600);
    assert!(saved.expires_at >= before + 3_600_000);
    assert!(saved.expires_at <= now_ms() + 3_600_000);

    // The persisted token is fresh now, so a second call stays local
    let token = manager.ensure_valid_access_token("alice").await.unwrap();
    assert_eq!(token, "A2");
}

#[tokio::test]
async fn test_rotated_refresh_token_is_persisted() {
    let (server, manager, store) = setup().await;
    seed(&store, "alice", &credentials("A1", "R1", -1_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    manager.ensure_valid_access_token("alice").await.unwrap();
    assert_eq!(stored(&store, "alice").await.unwrap().refresh_token, "R2");
}

#[tokio::test]
async fn test_empty_access_token_forces_refresh() {
    let (server, manager, store) = setup().await;
    seed(&store, "alice", &credentials("", "R1", 600_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        manager.ensure_valid_access_token("alice").await.unwrap(),
        "A2"
    );
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (_server, manager, _store) = setup().await;

    let err = manager.ensure_valid_access_token("nobody").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.requires_reauthorization());
}

#[tokio::test]
async fn test_corrupt_blob_is_reported() {
    let (_server, manager, store) = setup().await;
    store
        .set("alice", "{not json".to_string())
        .await
        .unwrap();

    let err = manager.ensure_valid_access_token("alice").await.unwrap_err();
    assert!(matches!(err, AppError::CorruptCredentials(_)));
    assert!(err.requires_reauthorization());
}

#[tokio::test]
async fn test_stale_token_without_refresh_token() {
    let (server, manager, store) = setup().await;
    seed(&store, "alice", &credentials("A1", "", -1_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = manager.ensure_valid_access_token("alice").await.unwrap_err();
    assert!(matches!(err, AppError::MissingRefreshToken));
}

#[tokio::test]
async fn test_rejected_refresh_leaves_store_untouched() {
    let (server, manager, store) = setup().await;
    let original = credentials("A1", "R1", -1_000);
    seed(&store, "alice", &original).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = manager.ensure_valid_access_token("alice").await.unwrap_err();
    assert!(matches!(err, AppError::Provider(_)));
    assert!(!err.requires_reauthorization());
    assert_eq!(stored(&store, "alice").await.unwrap(), original);
}

#[tokio::test]
async fn test_non_json_token_response_is_provider_error() {
    let (server, manager, store) = setup().await;
    seed(&store, "alice", &credentials("A1", "R1", -1_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = manager.ensure_valid_access_token("alice").await.unwrap_err();
    assert!(matches!(err, AppError::Provider(_)));
}

#[tokio::test]
async fn test_token_payload_missing_fields_is_invalid_response() {
    let (server, manager, store) = setup().await;
    seed(&store, "alice", &credentials("A1", "R1", -1_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = manager.ensure_valid_access_token("alice").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_network_error() {
    let store = MemoryCredentialStore::new();
    // Nothing listens on the discard port
    let manager = manager(&config_for("http://127.0.0.1:9"), &store);
    seed(&store, "alice", &credentials("A1", "R1", -1_000)).await;

    let err = manager.ensure_valid_access_token("alice").await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
}

#[tokio::test]
async fn test_authorization_code_exchange_persists_credentials() {
    let (server, manager, store) = setup().await;
    // Stale leftovers from an earlier link must not leak into the new record
    seed(&store, "alice", &credentials("OLD", "OLD-R", -1_000)).await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fspotify%2Fcallback",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "user-read-playback-state user-read-currently-playing",
            "refresh_token": "R1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = manager
        .exchange_authorization_code("alice", "the-code")
        .await
        .unwrap();
    assert_eq!(token, "A1");

    let saved = stored(&store, "alice").await.unwrap();
    assert_eq!(saved.access_token, "A1");
    assert_eq!(saved.refresh_token, "R1");
    assert_eq!(
        saved.scope,
        "user-read-playback-state user-read-currently-playing"
    );
}

#[tokio::test]
async fn test_authorization_code_exchange_requires_refresh_token() {
    let (server, manager, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = manager
        .exchange_authorization_code("alice", "the-code")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingRefreshToken));
    assert!(store.is_empty());
}
