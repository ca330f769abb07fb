// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify token endpoint client.
//!
//! Handles the two grants this service uses:
//! - `authorization_code` (first login)
//! - `refresh_token` (rotation when the access token goes stale)
//!
//! A single attempt per call; failures go straight back to the caller.

use crate::config::Config;
use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Undecoded token endpoint payload.
///
/// Guaranteed to be JSON; field validation is left to
/// [`crate::services::credentials::merge_credentials`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawTokenResponse(pub serde_json::Value);

/// Spotify token endpoint client.
#[derive(Clone)]
pub struct TokenExchangeClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl TokenExchangeClient {
    /// Create a client from the app config, sharing `http`'s connection pool.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            token_url: format!("{}/api/token", config.spotify_accounts_url),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri(),
        }
    }

    /// Exchange an authorization code from the OAuth callback.
    pub async fn exchange(&self, code: &str) -> Result<RawTokenResponse, AppError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// Trade a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RawTokenResponse, AppError> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<RawTokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .header(
                reqwest::header::AUTHORIZATION,
                basic_auth_header(&self.client_id, &self.client_secret),
            )
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Token response read failed: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Spotify token request rejected");
            return Err(AppError::Provider(format!(
                "Token endpoint returned status {}",
                status
            )));
        }

        serde_json::from_str(&body)
            .map(RawTokenResponse)
            .map_err(|e| AppError::Provider(format!("Token response is not JSON: {}", e)))
    }
}

/// `Authorization` header value for HTTP Basic client authentication.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        BASE64.encode(format!("{}:{}", client_id, client_secret))
    )
}
