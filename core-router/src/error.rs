//! # Router Error Types

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by request interception and cache lifecycle.
///
/// Fallback paths (cached shell, synthetic 503) never produce an error; only
/// primary-path failures with nothing to fall back to do.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Network failure with no cached response to serve instead.
    #[error("Network request for {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: BridgeError,
    },

    /// An app-shell resource could not be precached during install.
    #[error("Failed to precache {url}: {reason}")]
    Precache { url: String, reason: String },

    /// The worker scope refused an activation step.
    #[error("Worker scope error: {0}")]
    Worker(String),

    /// Cache storage failed.
    #[error("Cache storage error: {0}")]
    Storage(#[from] BridgeError),
}

impl RouterError {
    /// Returns `true` if this error is due to network issues.
    pub fn is_network_error(&self) -> bool {
        matches!(self, RouterError::Network { .. })
    }
}

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
