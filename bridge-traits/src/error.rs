use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The platform refused to start playback (autoplay policy, no user gesture).
    #[error("Playback blocked by platform: {0}")]
    PlaybackBlocked(String),

    /// The media resource could not be fetched or decoded.
    #[error("Media failed to load: {0}")]
    MediaLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` when the failure came from the network layer.
    pub fn is_network(&self) -> bool {
        matches!(self, BridgeError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
