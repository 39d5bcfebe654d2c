//! Session state types shared with hosts.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bridge_traits::MediaPlaybackState;

use crate::track::{Track, TrackId};

/// Transport state of the bound audio resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
}

impl PlaybackState {
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Loading | PlaybackState::Playing)
    }

    pub(crate) fn to_media_state(self) -> MediaPlaybackState {
        match self {
            PlaybackState::Playing | PlaybackState::Loading => MediaPlaybackState::Playing,
            PlaybackState::Paused | PlaybackState::Ended => MediaPlaybackState::Paused,
            PlaybackState::Idle => MediaPlaybackState::None,
        }
    }
}

/// Optional arguments to [`PlaybackSessionManager::play`](crate::PlaybackSessionManager::play).
#[derive(Debug, Clone, Default)]
pub struct PlayRequest {
    /// Replaces the current queue when present.
    pub queue: Option<Vec<Arc<Track>>>,
    pub shuffle: Option<bool>,
    pub repeat: Option<bool>,
}

impl PlayRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue(mut self, queue: Vec<Arc<Track>>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = Some(shuffle);
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = Some(repeat);
        self
    }
}

/// Point-in-time view of the session for UI rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Track>,
    pub queue: Vec<TrackId>,
    pub cursor: Option<usize>,
    pub shuffle: bool,
    pub repeat: bool,
    pub volume: f32,
    /// Listening seconds recorded but not yet flushed.
    pub pending_listening_secs: f64,
}
