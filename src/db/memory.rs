// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process credential store for local development and tests.

use super::CredentialStore;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Credential store backed by a shared concurrent map.
///
/// Clones share the same map. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    blobs: Arc<DashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with stored credentials.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, AppError> {
        Ok(self.blobs.get(user_id).map(|blob| blob.value().clone()))
    }

    async fn set(&self, user_id: &str, blob: String) -> Result<(), AppError> {
        self.blobs.insert(user_id.to_string(), blob);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_user() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_and_clones_share_state() {
        let store = MemoryCredentialStore::new();
        let other = store.clone();

        store.set("u1", "{\"a\":1}".to_string()).await.unwrap();
        other.set("u1", "{\"a\":2}".to_string()).await.unwrap();

        assert_eq!(store.get("u1").await.unwrap().as_deref(), Some("{\"a\":2}"));
        assert_eq!(store.len(), 1);
    }
}
