//! # Offline Cache Module
//!
//! Opt-in storage of audio responses for offline playback.
//!
//! ## Overview
//!
//! Users save individual tracks explicitly; nothing is ever added implicitly.
//! Entries are keyed by the exact audio URL and live in a dedicated,
//! version-independent cache name, so app-shell upgrades and the router's
//! activation cleanup never remove them.
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     OfflineAudioCache                  │
//! │  - cache(url)                          │
//! │  - is_cached(url)                      │
//! │  - remove(url) / clear_all()           │
//! └────────┬───────────────────────────────┘
//!          │
//!          ├──> Fetcher (download)
//!          └──> CacheStorage ("<app>-offline-audio")
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_playback::cache::OfflineAudioCache;
//!
//! # async fn example(cache: &OfflineAudioCache) -> core_playback::Result<()> {
//! cache.cache("https://cdn.example/audio/42.mp3").await?;
//! assert!(cache.is_cached("https://cdn.example/audio/42.mp3").await?);
//!
//! let usage = cache.usage().await?;
//! println!("{} tracks, {} MB", usage.entries, usage.total_bytes / 1_000_000);
//! # Ok(())
//! # }
//! ```

pub mod offline;
pub mod stats;

pub use offline::OfflineAudioCache;
pub use stats::OfflineCacheUsage;
