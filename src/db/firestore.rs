// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed credential store.
//!
//! One document per user in `spotify_credentials`, document ID = user id.
//! The credential blob is kept as a JSON string so the store never needs to
//! know its shape.

use super::{collections, CredentialStore};
use crate::error::AppError;
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Stored document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialDocument {
    /// Opaque credential blob (JSON)
    spotify: String,
    /// Last write (ISO 8601)
    updated_at: String,
}

/// Firestore credential store.
#[derive(Clone)]
pub struct FirestoreCredentialStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreCredentialStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator takes an unauthenticated connection
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline store; every operation fails with `Database`.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl CredentialStore for FirestoreCredentialStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let document: Option<CredentialDocument> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SPOTIFY_CREDENTIALS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(document.map(|d| d.spotify))
    }

    async fn set(&self, user_id: &str, blob: String) -> Result<(), AppError> {
        let document = CredentialDocument {
            spotify: blob,
            updated_at: format_utc_rfc3339(chrono::Utc::now()),
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SPOTIFY_CREDENTIALS)
            .document_id(user_id)
            .object(&document)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
