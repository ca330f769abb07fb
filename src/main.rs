// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! keyboard-api server
//!
//! Proxies Spotify playback (with album art thumbnails) and Open-Meteo
//! weather to a smart keyboard/display.

use keyboard_api::{
    config::Config,
    db::{CredentialStore, FirestoreCredentialStore, MemoryCredentialStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        server_url = %config.server_url,
        "Starting keyboard-api"
    );

    // Credential store: Firestore when a project is configured
    let store: Arc<dyn CredentialStore> = match &config.gcp_project_id {
        Some(project_id) => Arc::new(FirestoreCredentialStore::new(project_id).await?),
        None => {
            tracing::warn!("GCP_PROJECT_ID not set, credentials are kept in memory only");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store));

    // Build router
    let app = keyboard_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("keyboard_api=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
