use thiserror::Error;

/// Errors surfaced by bootstrap and by the services it hands out.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),

    #[error("Cache router error: {0}")]
    Router(#[from] core_router::RouterError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
