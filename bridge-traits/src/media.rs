//! Media element and media-session bridge traits.
//!
//! The playback session drives exactly one native audio element through
//! [`AudioElement`] and mirrors its state to the operating system's transport
//! controls through [`MediaSessionPort`]. Hosts forward element events back to
//! the session tagged with the [`BindingId`] they were attached with, so events
//! from a superseded track can be recognised and dropped.

use crate::{error::Result, platform::PlatformSendSync};
use std::sync::Arc;

/// Identifies one track binding on an audio element.
///
/// Bindings are issued in increasing order; a larger id always refers to a
/// more recent track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(u64);

impl BindingId {
    pub fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// Event emitted by a native audio element.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Periodic progress notification while the element advances.
    TimeUpdate,
    /// The element started or resumed playing on its own (e.g. OS control).
    Playing,
    /// The element paused on its own (e.g. headphones unplugged).
    Pause,
    /// Playback reached the end of the resource.
    Ended,
    /// The resource failed to load or decode.
    Error { message: String },
}

/// Handle to the native audio-decoding element.
///
/// Implementations forward native events for the currently attached binding
/// to the session and must stop doing so once [`detach`](Self::detach) is
/// called.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AudioElement: PlatformSendSync {
    /// Register native listeners that report events tagged with `binding`.
    fn attach(&self, binding: BindingId);

    /// Remove every listener registered by [`attach`](Self::attach).
    fn detach(&self);

    /// Point the element at a new resource and begin loading it.
    fn set_source(&self, url: &str);

    /// Release the current resource.
    fn clear_source(&self);

    /// Start or resume playback.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::PlaybackBlocked`](crate::BridgeError::PlaybackBlocked)
    ///   when the platform refuses to start without a user gesture
    /// - [`BridgeError::MediaLoad`](crate::BridgeError::MediaLoad) when the
    ///   resource cannot be loaded
    async fn play(&self) -> Result<()>;

    fn pause(&self);

    fn is_paused(&self) -> bool;

    /// Current media position in seconds.
    fn current_time(&self) -> f64;

    fn set_current_time(&self, seconds: f64);

    /// Media duration in seconds, `None` until metadata has loaded.
    fn duration(&self) -> Option<f64>;

    /// Volume normalised to `0.0..=1.0`.
    fn set_volume(&self, volume: f32);
}

/// Lazily constructs the audio element the first time a session needs one.
pub trait AudioElementFactory: PlatformSendSync {
    fn create(&self) -> Result<Arc<dyn AudioElement>>;
}

/// Now-playing metadata published to the OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaMetadata {
    pub title: String,
    pub artist: String,
    pub artwork: Option<String>,
}

/// Playback state as understood by OS transport controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaPlaybackState {
    #[default]
    None,
    Paused,
    Playing,
}

/// Position information for OS scrubbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionState {
    pub duration: f64,
    pub position: f64,
    pub playback_rate: f64,
}

/// Transport command received from OS-level media controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaAction {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
    SeekTo(f64),
}

/// Outbound notification port for OS media integration.
///
/// Inbound commands travel the other way: the host registers native action
/// handlers and forwards each [`MediaAction`] to the session.
pub trait MediaSessionPort: PlatformSendSync {
    /// Publish now-playing metadata; `None` clears it.
    fn set_metadata(&self, metadata: Option<MediaMetadata>);

    fn set_playback_state(&self, state: MediaPlaybackState);

    fn set_position_state(&self, _state: PositionState) {}
}
