// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! keyboard-api: backend for a smart keyboard/display
//!
//! This crate proxies Spotify playback and Open-Meteo weather to the device,
//! owning the Spotify OAuth token lifecycle and album art thumbnailing.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::CredentialStore;
use services::{
    CredentialManager, SpotifyClient, SpotifyService, ThumbnailPipeline, TokenExchangeClient,
    WeatherService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub spotify: SpotifyService,
    pub thumbnails: ThumbnailPipeline,
    pub weather: WeatherService,
}

impl AppState {
    /// Wire every service to `config` and the given credential store.
    ///
    /// All outbound HTTP shares one connection pool.
    pub fn new(config: Config, store: Arc<dyn CredentialStore>) -> Self {
        let http = reqwest::Client::new();

        let credentials =
            CredentialManager::new(store, TokenExchangeClient::new(http.clone(), &config));
        let spotify = SpotifyService::new(
            SpotifyClient::new(http.clone(), config.spotify_api_url.clone()),
            credentials,
            config.server_url.clone(),
        );

        Self {
            thumbnails: ThumbnailPipeline::new(http.clone()),
            weather: WeatherService::new(http, config.open_meteo_url.clone()),
            spotify,
            config,
        }
    }
}
