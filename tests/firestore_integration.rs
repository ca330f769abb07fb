// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore credential store tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST` set); they skip otherwise.

use keyboard_api::db::{CredentialStore, FirestoreCredentialStore};

mod common;

/// Unique user ID for test isolation.
fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-user-{}", nanos)
}

async fn test_store() -> FirestoreCredentialStore {
    FirestoreCredentialStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[tokio::test]
async fn test_missing_user_reads_none() {
    require_emulator!();

    let store = test_store().await;
    assert_eq!(store.get(&unique_user_id()).await.unwrap(), None);
}

#[tokio::test]
async fn test_set_then_get_returns_blob() {
    require_emulator!();

    let store = test_store().await;
    let user_id = unique_user_id();
    let blob = r#"{"access_token":"A1","refresh_token":"R1"}"#.to_string();

    store.set(&user_id, blob.clone()).await.unwrap();
    assert_eq!(store.get(&user_id).await.unwrap(), Some(blob));
}

#[tokio::test]
async fn test_set_replaces_previous_blob() {
    require_emulator!();

    let store = test_store().await;
    let user_id = unique_user_id();

    store.set(&user_id, "first".to_string()).await.unwrap();
    store.set(&user_id, "second".to_string()).await.unwrap();
    assert_eq!(
        store.get(&user_id).await.unwrap(),
        Some("second".to_string())
    );
}
