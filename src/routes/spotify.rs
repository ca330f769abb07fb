// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify routes: OAuth login flow, playback and album art.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CurrentlyPlaying, OAuthState};
use crate::services::spotify::authorize_url;
use crate::services::thumbnail::validate_dimensions;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Routes reachable without a session (Spotify redirects the browser here).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/spotify/callback", get(callback))
        .route("/spotify/callback/success", get(callback_success))
}

/// Routes requiring a session; auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/spotify/loginUrl", get(login_url))
        .route("/spotify/currently-playing", get(currently_playing))
        .route("/spotify/currently-playing-art", get(currently_playing_art))
}

// ─── Login Flow ──────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginUrlResponse {
    pub url: String,
}

/// Build the Spotify authorization URL for the signed-in user.
async fn login_url(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LoginUrlResponse>> {
    let oauth_state = encode_state(
        &OAuthState {
            user_id: user.user_id.clone(),
        },
        &state.config.oauth_state_key,
    )?;

    tracing::info!(user_id = %user.user_id, "Starting Spotify OAuth flow");

    Ok(Json(LoginUrlResponse {
        url: authorize_url(&state.config, &oauth_state),
    }))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code and store credentials for the user in `state`.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        tracing::warn!(error = %error, "OAuth error from Spotify");
        return Err(AppError::BadRequest("Error during authentication".to_string()));
    }

    let oauth_state = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key))
        .ok_or_else(|| AppError::BadRequest("Invalid state".to_string()))?;

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("code is required".to_string()))?;

    tracing::info!(user_id = %oauth_state.user_id, "Exchanging authorization code for tokens");

    state
        .spotify
        .credentials()
        .exchange_authorization_code(&oauth_state.user_id, &code)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = %oauth_state.user_id, error = %e, "Spotify code exchange failed");
            AppError::BadRequest("Failed to exchange code for token".to_string())
        })?;

    Ok(Redirect::temporary(
        &state.config.server_url("/spotify/callback/success"),
    ))
}

/// Landing page after a successful link.
async fn callback_success() -> &'static str {
    "Spotify account connected. You can close this window."
}

/// Sign and encode an [`OAuthState`] for the `state` query parameter.
///
/// Format before base64: `<json>|<hex hmac-sha256 of json>`.
fn encode_state(oauth_state: &OAuthState, secret: &[u8]) -> Result<String> {
    let payload = serde_json::to_string(oauth_state)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("State encode failed: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Verify the HMAC signature and decode the [`OAuthState`] from `state`.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<OAuthState> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // The signature is hex, so the last '|' always separates it
    let (payload, signature_hex) = state_str.rsplit_once('|')?;
    let signature = hex::decode(signature_hex).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    if mac.verify_slice(&signature).is_err() {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    serde_json::from_str(payload).ok()
}

// ─── Playback ────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ThumbnailParams {
    #[serde(default, rename = "thumbnailWidth")]
    thumbnail_width: Option<String>,
    #[serde(default, rename = "thumbnailHeight")]
    thumbnail_height: Option<String>,
}

/// Lenient integer parse; anything unparseable counts as absent.
fn parse_dimension(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// What the signed-in user is playing.
async fn currently_playing(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ThumbnailParams>,
) -> Result<Json<CurrentlyPlaying>> {
    // A missing size only means no album art URL
    let width = parse_dimension(params.thumbnail_width.as_deref()).unwrap_or(0);
    let height = parse_dimension(params.thumbnail_height.as_deref()).unwrap_or(0);

    let playing = state
        .spotify
        .currently_playing(&user.user_id, width, height)
        .await
        .map_err(|e| {
            if e.requires_reauthorization() {
                tracing::info!(user_id = %user.user_id, error = %e, "Spotify not linked");
                AppError::BadRequest("Could not get spotify token".to_string())
            } else {
                e
            }
        })?;

    Ok(Json(playing))
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtParams {
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "thumbnailWidth")]
    thumbnail_width: Option<String>,
    #[serde(default, rename = "thumbnailHeight")]
    thumbnail_height: Option<String>,
}

/// Album art as a BMP thumbnail.
///
/// Fetch and decode failures answer 200 with an empty body so a broken cover
/// never breaks the now-playing screen.
async fn currently_playing_art(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArtParams>,
) -> Result<Response> {
    let url = params
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("url is required".to_string()))?;

    let (width, height) = validate_dimensions(
        parse_dimension(params.thumbnail_width.as_deref()),
        parse_dimension(params.thumbnail_height.as_deref()),
    )?;

    let bitmap = match state.thumbnails.render_thumbnail(&url, width, height).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Album art thumbnail failed, returning empty image");
            Vec::new()
        }
    };

    Ok(([(header::CONTENT_TYPE, "image/bmp")], bitmap).into_response())
}
