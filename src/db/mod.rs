//! Credential persistence.
//!
//! The store only sees opaque JSON blobs keyed by user id; typing happens in
//! [`crate::services::CredentialManager`].

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreCredentialStore;
pub use memory::MemoryCredentialStore;

use crate::error::AppError;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    /// Spotify credential blobs (keyed by user id)
    pub const SPOTIFY_CREDENTIALS: &str = "spotify_credentials";
}

/// Record store holding one credential blob per user.
///
/// Writes are last-write-wins; there is no compare-and-set.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the stored blob for `user_id`, if any.
    async fn get(&self, user_id: &str) -> Result<Option<String>, AppError>;

    /// Replace the stored blob for `user_id`.
    async fn set(&self, user_id: &str, blob: String) -> Result<(), AppError>;
}
