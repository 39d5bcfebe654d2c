//! # Playback Collaborator Traits
//!
//! The session talks to the backend only through [`SessionBackend`]. Track
//! lookup, playlists and authentication flows live elsewhere; the session
//! needs the two persistence calls and a way to ask whether an identity is
//! signed in.

use bridge_traits::platform::PlatformSendSync;

use crate::error::Result;
use crate::track::TrackId;

/// Backend persistence used by the playback session.
///
/// Failures are logged by the session and never retried or surfaced to the
/// transport command that triggered them.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait SessionBackend: PlatformSendSync {
    /// Increment the server-side play count. Called at most once per binding.
    async fn play_song(&self, track_id: &TrackId) -> Result<()>;

    /// Persist whole listening seconds for the signed-in identity.
    async fn add_listening_time(&self, seconds: u64) -> Result<()>;

    /// Whether an identity is signed in. Listening time is not flushed otherwise.
    fn is_authenticated(&self) -> bool;
}
