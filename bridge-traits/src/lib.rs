//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host environment must implement.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback/caching core and the
//! platform it runs on. The core never touches browser globals or native audio
//! APIs directly; it talks to these traits instead, which keeps request
//! classification, caching strategies and the playback state machine testable
//! without a network, a cache backend or a sound card.
//!
//! ## Traits
//!
//! ### Networking & Caching
//! - [`Fetcher`](fetch::Fetcher) - Network round trips for intercepted requests
//! - [`CacheStorage`](cache::CacheStorage) / [`Cache`](cache::Cache) - Named request/response caches
//! - [`WorkerScope`](worker::WorkerScope) - Service-worker activation hooks
//!
//! ### Media
//! - [`AudioElement`](media::AudioElement) - The single native audio-decoding resource
//! - [`AudioElementFactory`](media::AudioElementFactory) - Lazy construction of that resource
//! - [`MediaSessionPort`](media::MediaSessionPort) - OS now-playing and transport controls
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Wall-clock source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should map transport failures to `BridgeError::Network` and autoplay
//! refusals to `BridgeError::PlaybackBlocked` so the core can pick the right
//! recovery path.
//!
//! ## Thread Safety
//!
//! Every bridge trait is bounded by
//! [`PlatformSendSync`](platform::PlatformSendSync): `Send + Sync` on native
//! targets, no bound on `wasm32` where browser handles are single threaded.
//! Async traits follow the same split (`async_trait(?Send)` on `wasm32`).

pub mod cache;
pub mod error;
pub mod fetch;
pub mod media;
pub mod platform;
pub mod time;
pub mod worker;

pub use error::BridgeError;

// Re-export commonly used types
pub use cache::{Cache, CacheStorage};
pub use fetch::{
    FetchRequest, FetchResponse, Fetcher, HttpMethod, RequestDestination, RequestMode,
    ResponseType,
};
pub use media::{
    AudioElement, AudioElementFactory, AudioEvent, BindingId, MediaAction, MediaMetadata,
    MediaPlaybackState, MediaSessionPort, PositionState,
};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
pub use worker::WorkerScope;
