//! Workspace umbrella crate.
//!
//! Exposes feature flags that map onto the individual workspace crates
//! (`core-service`, `core-playback`, `core-router`). Host applications can
//! depend on `cadence-workspace` and enable the documented features without
//! wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;

#[cfg(feature = "playback")]
pub use core_playback as playback;

#[cfg(feature = "service-worker")]
pub use core_router as router;
