// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credentials;
pub mod playback;
pub mod weather;

pub use credentials::{Credentials, OAuthState, TokenResponse};
pub use playback::{Artist, CurrentlyPlaying, ImageVariant, RawCurrentlyPlaying};
pub use weather::{CurrentWeather, DailyForecast, HourlyForecast};
