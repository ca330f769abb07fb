//! Spotify credential models for storage and the OAuth flow.

use serde::{Deserialize, Serialize};

/// Spotify credentials stored per user.
///
/// Persisted as an opaque JSON blob through the credential store; the field
/// names are the wire format of that blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token for Web API calls
    pub access_token: String,
    /// Informational, usually "Bearer"
    #[serde(default)]
    pub token_type: String,
    /// Lifetime declared by Spotify at issuance (seconds)
    #[serde(default)]
    pub expires_in: i64,
    /// Absolute expiry (epoch milliseconds)
    #[serde(default)]
    pub expires_at: i64,
    /// Space-delimited granted scopes
    #[serde(default)]
    pub scope: String,
    /// Long-lived rotation credential
    #[serde(default)]
    pub refresh_token: String,
}

impl Credentials {
    /// Whether the access token must be refreshed before use.
    ///
    /// Stale means it expires within `buffer_ms` of `now_ms` (or already has),
    /// or there is no access token at all.
    pub fn is_stale(&self, now_ms: i64, buffer_ms: i64) -> bool {
        self.access_token.is_empty() || self.expires_at < now_ms + buffer_ms
    }
}

/// Token payload returned by the Spotify token endpoint.
///
/// `refresh_token` is omitted by Spotify on most refresh responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Value carried through Spotify in the OAuth `state` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthState {
    pub user_id: String,
}
