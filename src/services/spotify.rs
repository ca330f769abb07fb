// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Web API client and playback service.
//!
//! Handles:
//! - Building the authorization URL for the login flow
//! - Fetching the user's currently playing item
//! - Reshaping it for the device, including the album art thumbnail URL

use crate::config::{Config, SPOTIFY_SCOPES};
use crate::error::AppError;
use crate::models::{CurrentlyPlaying, RawCurrentlyPlaying};
use crate::services::album_art::best_fit_art_url;
use crate::services::credentials::CredentialManager;
use reqwest::StatusCode;

/// Spotify Web API client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Get the user's currently playing item.
    ///
    /// Spotify answers `204 No Content` when nothing is playing; that maps to
    /// an empty (not playing) payload.
    pub async fn currently_playing(
        &self,
        access_token: &str,
    ) -> Result<RawCurrentlyPlaying, AppError> {
        let url = format!("{}/me/player/currently-playing", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(RawCurrentlyPlaying::default());
        }

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Spotify rate limit hit (429)");
            }

            return Err(AppError::Provider(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))
    }
}

/// Spotify authorization URL carrying `state` through the login flow.
pub fn authorize_url(config: &Config, state: &str) -> String {
    format!(
        "{}/authorize?\
         client_id={}&\
         response_type=code&\
         redirect_uri={}&\
         scope={}&\
         state={}",
        config.spotify_accounts_url,
        urlencoding::encode(&config.spotify_client_id),
        urlencoding::encode(&config.spotify_redirect_uri()),
        urlencoding::encode(SPOTIFY_SCOPES),
        urlencoding::encode(state)
    )
}

/// Reshape a raw playback payload for the device.
///
/// Anything other than a track (nothing, an episode, an ad) yields the idle
/// payload with only `is_playing` carried over.
pub fn reshape_currently_playing(
    raw: RawCurrentlyPlaying,
    server_url: &str,
    thumbnail_width: i64,
    thumbnail_height: i64,
) -> CurrentlyPlaying {
    let track = match raw.item {
        Some(track) if raw.currently_playing_type == "track" => track,
        _ => return CurrentlyPlaying::idle(raw.is_playing),
    };

    let album_art_url = best_fit_art_url(
        server_url,
        &track.album.images,
        thumbnail_width,
        thumbnail_height,
    );

    CurrentlyPlaying {
        is_playing: raw.is_playing,
        track_id: track.id,
        track_name: track.name,
        popularity: track.popularity,
        track_length_ms: track.duration_ms,
        track_progress_ms: raw.progress_ms.unwrap_or_default(),
        album_id: track.album.id,
        album_name: track.album.name,
        album_art_url,
        artists: track.artists,
    }
}

/// High-level playback service: token lifecycle plus Web API calls.
#[derive(Clone)]
pub struct SpotifyService {
    client: SpotifyClient,
    credentials: CredentialManager,
    server_url: String,
}

impl SpotifyService {
    pub fn new(client: SpotifyClient, credentials: CredentialManager, server_url: String) -> Self {
        Self {
            client,
            credentials,
            server_url,
        }
    }

    /// Credential lifecycle for this service's users.
    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// What `user_id` is playing right now, reshaped for the device.
    pub async fn currently_playing(
        &self,
        user_id: &str,
        thumbnail_width: i64,
        thumbnail_height: i64,
    ) -> Result<CurrentlyPlaying, AppError> {
        let access_token = self.credentials.ensure_valid_access_token(user_id).await?;
        let raw = self.client.currently_playing(&access_token).await?;

        Ok(reshape_currently_playing(
            raw,
            &self.server_url,
            thumbnail_width,
            thumbnail_height,
        ))
    }
}
