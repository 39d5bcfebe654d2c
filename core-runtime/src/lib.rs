//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the playback session and the
//! caching layer:
//! - Logging and tracing setup
//! - Configuration and derived cache names
//! - Typed event bus
//!
//! ## Overview
//!
//! Nothing in this crate touches audio or the network. It establishes the
//! logging conventions, the configuration contract and the event broadcasting
//! mechanism the other crates build on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CacheNames, CoreConfig, CoreConfigBuilder, PlaybackSettings};
pub use error::{Error, Result};
pub use events::{CacheEvent, CoreEvent, EventBus, EventStream, PlaybackEvent};
