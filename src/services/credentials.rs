// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify credential lifecycle.
//!
//! Owns the decisions around stored tokens:
//! - Whether a stored access token is still usable (5 second look-ahead)
//! - Refreshing and persisting when it is not
//! - Merging token endpoint payloads into stored credentials without ever
//!   losing the refresh token
//!
//! There is no in-process cache and no per-user lock. Every call reads the
//! store, and two concurrent refreshes for one user race (last write wins).

use crate::db::CredentialStore;
use crate::error::AppError;
use crate::models::{Credentials, TokenResponse};
use crate::services::token_exchange::{RawTokenResponse, TokenExchangeClient};
use crate::time_utils::now_epoch_millis;
use std::sync::Arc;

/// Refresh tokens this long (ms) before their declared expiry.
pub const REFRESH_BUFFER_MS: i64 = 5000;

/// Loads, refreshes and persists per-user Spotify credentials.
#[derive(Clone)]
pub struct CredentialManager {
    store: Arc<dyn CredentialStore>,
    exchange: TokenExchangeClient,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn CredentialStore>, exchange: TokenExchangeClient) -> Self {
        Self { store, exchange }
    }

    /// Load the typed credentials for `user_id`.
    pub async fn load(&self, user_id: &str) -> Result<Credentials, AppError> {
        let blob = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spotify credentials for user {}", user_id)))?;

        serde_json::from_str(&blob).map_err(|e| {
            tracing::warn!(user_id, error = %e, "Stored Spotify credentials are corrupt");
            AppError::CorruptCredentials(format!("user {}: {}", user_id, e))
        })
    }

    /// Persist `credentials` for `user_id`, replacing what was there.
    pub async fn save(&self, user_id: &str, credentials: &Credentials) -> Result<(), AppError> {
        let blob = serde_json::to_string(credentials)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Credential encode failed: {}", e)))?;
        self.store.set(user_id, blob).await
    }

    /// Get a usable access token for `user_id`, refreshing if needed.
    ///
    /// Fast path: a non-empty token expiring at least [`REFRESH_BUFFER_MS`]
    /// from now is returned without any network call. Otherwise exactly one
    /// refresh request is made and the merged result is persisted.
    pub async fn ensure_valid_access_token(&self, user_id: &str) -> Result<String, AppError> {
        let existing = self.load(user_id).await?;

        if !existing.is_stale(now_epoch_millis(), REFRESH_BUFFER_MS) {
            return Ok(existing.access_token);
        }

        if existing.refresh_token.is_empty() {
            tracing::warn!(user_id, "Access token stale and no refresh token stored");
            return Err(AppError::MissingRefreshToken);
        }

        tracing::info!(user_id, "Spotify access token stale, refreshing");

        let fresh = self.exchange.refresh(&existing.refresh_token).await?;
        let merged = merge_credentials(Some(&existing), &fresh, now_epoch_millis())?;
        self.save(user_id, &merged).await?;

        tracing::info!(
            user_id,
            rotated = merged.refresh_token != existing.refresh_token,
            "Spotify token refreshed"
        );
        Ok(merged.access_token)
    }

    /// First-time flow: exchange an authorization code and persist the result.
    ///
    /// Any previously stored credentials are ignored, so the response must
    /// carry a refresh token.
    pub async fn exchange_authorization_code(
        &self,
        user_id: &str,
        code: &str,
    ) -> Result<String, AppError> {
        let fresh = self.exchange.exchange(code).await?;
        let credentials = merge_credentials(None, &fresh, now_epoch_millis())?;
        self.save(user_id, &credentials).await?;

        tracing::info!(user_id, scope = %credentials.scope, "Spotify account linked");
        Ok(credentials.access_token)
    }
}

/// Build the credentials to persist from a token endpoint payload.
///
/// Every field comes from `fresh`, except that an absent or empty refresh
/// token keeps `existing`'s. Expiry is `now_ms + expires_in` seconds.
pub fn merge_credentials(
    existing: Option<&Credentials>,
    fresh: &RawTokenResponse,
    now_ms: i64,
) -> Result<Credentials, AppError> {
    let token: TokenResponse = serde_json::from_value(fresh.0.clone())
        .map_err(|e| AppError::InvalidResponse(e.to_string()))?;

    let refresh_token = token
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| {
            existing
                .map(|c| c.refresh_token.clone())
                .filter(|t| !t.is_empty())
        })
        .ok_or(AppError::MissingRefreshToken)?;

    Ok(Credentials {
        access_token: token.access_token,
        token_type: token.token_type,
        expires_in: token.expires_in,
        expires_at: now_ms.saturating_add(token.expires_in.saturating_mul(1000)),
        scope: token.scope,
        refresh_token,
    })
}
