//! # Playback Error Types
//!
//! Error types for the playback session and the offline audio cache.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// Track was not found in the current queue.
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// The audio resource could not be loaded or decoded.
    #[error("Audio source unavailable: {0}")]
    SourceUnavailable(String),

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// The platform refused to start playback without a user gesture.
    #[error("Playback blocked: {0}")]
    PlaybackBlocked(String),

    /// Attempted operation when no track is loaded.
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The audio element could not be constructed.
    #[error("Audio element unavailable: {0}")]
    AudioElementUnavailable(String),

    // ========================================================================
    // Cache Errors
    // ========================================================================
    /// Offline cache was asked to store an empty URL.
    #[error("Invalid audio URL: {0:?}")]
    InvalidUrl(String),

    /// Download for the offline cache returned a non-success status.
    #[error("Download of {url} failed with status {status}")]
    DownloadFailed { url: String, status: u16 },

    /// Offline cache operation failed.
    #[error("Cache error: {0}")]
    CacheError(String),

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// The backend rejected or failed a play-count or listening-time call.
    #[error("Backend call failed: {0}")]
    Backend(String),

    /// User is not authenticated.
    #[error("Not authenticated")]
    NotAuthenticated,

    // ========================================================================
    // Generic Errors
    // ========================================================================
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Returns `true` if this error is transient and the operation can be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaybackError::PlaybackBlocked(_)
                | PlaybackError::SourceUnavailable(_)
                | PlaybackError::DownloadFailed { .. }
        ) || self.is_network_error()
    }

    /// Returns `true` if this error is due to network issues.
    pub fn is_network_error(&self) -> bool {
        match self {
            PlaybackError::Bridge(err) => err.is_network(),
            PlaybackError::DownloadFailed { .. } => true,
            _ => false,
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
