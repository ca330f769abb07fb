// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use keyboard_api::config::Config;
use keyboard_api::db::{CredentialStore, MemoryCredentialStore};
use keyboard_api::middleware::auth::create_jwt;
use keyboard_api::models::Credentials;
use keyboard_api::routes::create_router;
use keyboard_api::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Config whose upstream URLs all point at `upstream` (a wiremock server).
#[allow(dead_code)]
pub fn config_for(upstream: &str) -> Config {
    Config {
        spotify_accounts_url: upstream.to_string(),
        spotify_api_url: upstream.to_string(),
        open_meteo_url: upstream.to_string(),
        ..Config::test_default()
    }
}

/// Create a test app backed by an in-memory credential store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>, MemoryCredentialStore) {
    let store = MemoryCredentialStore::new();
    let state = Arc::new(AppState::new(config, Arc::new(store.clone())));
    (create_router(state.clone()), state, store)
}

/// Session JWT for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("JWT should encode")
}

/// Authenticated GET request.
#[allow(dead_code)]
pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Unauthenticated GET request.
#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Current time as epoch milliseconds.
#[allow(dead_code)]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Credentials expiring `expires_in_ms` from now.
#[allow(dead_code)]
pub fn credentials(access_token: &str, refresh_token: &str, expires_in_ms: i64) -> Credentials {
    Credentials {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        expires_at: now_ms() + expires_in_ms,
        scope: "user-read-playback-state user-read-currently-playing".to_string(),
        refresh_token: refresh_token.to_string(),
    }
}

/// Seed the store with `credentials` for `user_id`.
#[allow(dead_code)]
pub async fn seed(store: &MemoryCredentialStore, user_id: &str, credentials: &Credentials) {
    store
        .set(user_id, serde_json::to_string(credentials).unwrap())
        .await
        .unwrap();
}

/// Read back the typed credentials stored for `user_id`.
#[allow(dead_code)]
pub async fn stored(store: &MemoryCredentialStore, user_id: &str) -> Option<Credentials> {
    store
        .get(user_id)
        .await
        .unwrap()
        .map(|blob| serde_json::from_str(&blob).expect("stored blob should parse"))
}

/// Read a whole response body.
#[allow(dead_code)]
pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}
