//! Spotify playback models: raw Web API payloads and the reshaped response.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Decode an explicit JSON `null` as the type's default.
///
/// `#[serde(default)]` alone only covers a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One resolution of an album's artwork, as offered by Spotify.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageVariant {
    pub url: String,
    /// 0 when Spotify does not know the size
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: i64,
}

/// Artist reference (same shape upstream and downstream).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Artist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// `GET /me/player/currently-playing` response (fields we use).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<RawTrack>,
    #[serde(default)]
    pub currently_playing_type: String,
    #[serde(default)]
    pub progress_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrack {
    /// Null for local files
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_ms: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub album: RawAlbum,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAlbum {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ImageVariant>,
}

/// Reshaped "now playing" payload for the device.
///
/// Every track field is empty or zero when no track is playing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CurrentlyPlaying {
    pub is_playing: bool,
    pub track_id: String,
    pub track_name: String,
    pub popularity: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub track_length_ms: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub track_progress_ms: u64,
    pub album_id: String,
    pub album_name: String,
    pub album_art_url: String,
    pub artists: Vec<Artist>,
}

impl CurrentlyPlaying {
    /// Payload for "nothing (or not a track) is playing".
    pub fn idle(is_playing: bool) -> Self {
        Self {
            is_playing,
            ..Default::default()
        }
    }
}
