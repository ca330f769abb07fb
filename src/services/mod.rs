// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod album_art;
pub mod credentials;
pub mod spotify;
pub mod thumbnail;
pub mod token_exchange;
pub mod weather;

pub use credentials::{merge_credentials, CredentialManager, REFRESH_BUFFER_MS};
pub use spotify::{SpotifyClient, SpotifyService};
pub use thumbnail::ThumbnailPipeline;
pub use token_exchange::{RawTokenResponse, TokenExchangeClient};
pub use weather::WeatherService;
