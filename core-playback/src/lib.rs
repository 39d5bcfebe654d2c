//! # Playback Session & Offline Audio
//!
//! Client-side playback orchestration for Cadence.
//!
//! ## Overview
//!
//! This crate handles:
//! - The playback session: one audio element, the queue, transport state
//! - Listening-time accounting with bounded wall-clock deltas
//! - Play-count and listening-time persistence through [`SessionBackend`]
//! - The opt-in offline audio cache
//!
//! Decoding, buffering and transport of audio bytes belong to the host's
//! native audio element, reached through `bridge_traits::AudioElement`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_playback::{PlayRequest, PlaybackSessionManager};
//!
//! # async fn example(session: &PlaybackSessionManager, album: Vec<std::sync::Arc<core_playback::Track>>) -> core_playback::Result<()> {
//! let first = album[0].clone();
//! session
//!     .play(first, PlayRequest::new().with_queue(album).with_repeat(true))
//!     .await?;
//! session.next().await?;
//! session.pause().await;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod ledger;
pub mod queue;
pub mod session;
pub mod state;
pub mod traits;
pub mod track;

pub use cache::{OfflineAudioCache, OfflineCacheUsage};
pub use error::{PlaybackError, Result};
pub use ledger::{ListeningLedger, SampleOutcome};
pub use queue::PlaybackQueue;
pub use session::PlaybackSessionManager;
pub use state::{PlayRequest, PlaybackState, SessionSnapshot};
pub use traits::SessionBackend;
pub use track::{Track, TrackId};
