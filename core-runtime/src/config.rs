//! # Core Configuration Module
//!
//! Provides configuration management for the Cadence client core.
//!
//! ## Overview
//!
//! A builder constructs a [`CoreConfig`] holding everything the playback
//! session and the caching layer need to know at startup: the application
//! name and cache version (from which every cache name is derived), the app
//! shell to precache, the audio classification rules, and the listening-time
//! accounting thresholds. `build()` validates eagerly so a misconfigured
//! deployment fails at startup rather than on the first intercepted request.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .app_name("cadence")
//!     .cache_version("v2")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.cache_names().app_shell, "cadence-v2");
//! assert_eq!(config.cache_names().offline_audio, "cadence-offline-audio");
//! ```
//!
//! ## Cache names
//!
//! | Slot | Pattern | Survives version bump |
//! |------|---------|-----------------------|
//! | app shell | `<app>-<version>` | no |
//! | automatic audio | `<app>-audio-<version>` | no |
//! | offline audio | `<app>-offline-audio` | yes |

use crate::error::{Error, Result};
use std::time::Duration;

/// Default application name used as the cache-name prefix.
pub const DEFAULT_APP_NAME: &str = "cadence";

/// Default cache generation.
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// App-shell resources precached on install.
pub const DEFAULT_PRECACHE_URLS: &[&str] = &[
    "/",
    "/manifest.json",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

/// File extensions that classify a request as audio.
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];

/// Path fragment that classifies a request as audio.
pub const DEFAULT_AUDIO_PATH_MARKER: &str = "/audio/";

/// The set of cache names the client owns at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    /// Current app-shell generation.
    pub app_shell: String,
    /// Current automatic audio cache generation (never populated implicitly).
    pub audio: String,
    /// Version-independent cache filled only by explicit user action.
    pub offline_audio: String,
}

impl CacheNames {
    /// Derive the three cache names from an application name and version.
    pub fn derive(app_name: &str, version: &str) -> Self {
        Self {
            app_shell: format!("{}-{}", app_name, version),
            audio: format!("{}-audio-{}", app_name, version),
            offline_audio: format!("{}-offline-audio", app_name),
        }
    }

    /// Returns `true` if `name` is one of the caches that must survive activation.
    pub fn is_retained(&self, name: &str) -> bool {
        name == self.app_shell || name == self.audio || name == self.offline_audio
    }

    /// Fails if any two slots resolve to the same name.
    pub fn validate(&self) -> Result<()> {
        if self.app_shell == self.audio
            || self.app_shell == self.offline_audio
            || self.audio == self.offline_audio
        {
            return Err(Error::Config(format!(
                "Cache names must be distinct (app shell: '{}', audio: '{}', offline audio: '{}')",
                self.app_shell, self.audio, self.offline_audio
            )));
        }
        Ok(())
    }
}

/// Listening-time accounting and transport defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSettings {
    /// Wall-clock gaps at or above this are discarded rather than credited.
    pub max_sample_gap: Duration,
    /// Period of the background flush timer.
    pub flush_interval: Duration,
    /// Minimum accumulated seconds before the timer flushes.
    pub flush_threshold_secs: f64,
    /// Volume applied when the audio element is first created.
    pub initial_volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            max_sample_gap: Duration::from_secs(5),
            flush_interval: Duration::from_secs(10),
            flush_threshold_secs: 10.0,
            initial_volume: 1.0,
        }
    }
}

impl PlaybackSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_sample_gap.is_zero() {
            return Err(Error::Config(
                "max_sample_gap must be greater than zero".to_string(),
            ));
        }
        if self.flush_interval.is_zero() {
            return Err(Error::Config(
                "flush_interval must be greater than zero".to_string(),
            ));
        }
        if self.flush_threshold_secs.is_nan() || self.flush_threshold_secs <= 0.0 {
            return Err(Error::Config(
                "flush_threshold_secs must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::Config(format!(
                "initial_volume {} must be between 0.0 and 1.0",
                self.initial_volume
            )));
        }
        Ok(())
    }
}

/// Core configuration for the Cadence client.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Prefix for every cache name.
    pub app_name: String,
    /// Cache generation; bumping it retires the previous app shell.
    pub cache_version: String,
    /// Resources stored in the app-shell cache on install.
    pub precache_urls: Vec<String>,
    /// Document served when a navigation fails offline with no exact match.
    pub root_document: String,
    /// Lower-case file extensions treated as audio.
    pub audio_extensions: Vec<String>,
    /// Path fragment treated as audio.
    pub audio_path_marker: String,
    pub playback: PlaybackSettings,
    pub event_buffer_size: usize,
    cache_names: CacheNames,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Cache names derived from the app name and version.
    pub fn cache_names(&self) -> &CacheNames {
        &self.cache_names
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - App name and cache version are non-empty
    /// - The precache list is non-empty and includes the root document
    /// - Derived cache names are pairwise distinct
    /// - Playback thresholds are positive
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(Error::Config("App name cannot be empty".to_string()));
        }

        if self.cache_version.trim().is_empty() {
            return Err(Error::Config("Cache version cannot be empty".to_string()));
        }

        if self.precache_urls.is_empty() {
            return Err(Error::Config(
                "At least one app-shell URL must be precached".to_string(),
            ));
        }

        if !self.precache_urls.contains(&self.root_document) {
            return Err(Error::Config(format!(
                "Root document '{}' must be part of the precache list so offline navigation has a fallback",
                self.root_document
            )));
        }

        if self.audio_extensions.iter().any(|ext| ext.is_empty()) {
            return Err(Error::Config(
                "Audio extensions cannot contain empty entries".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        self.cache_names.validate()?;
        self.playback.validate()
    }
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    app_name: Option<String>,
    cache_version: Option<String>,
    precache_urls: Option<Vec<String>>,
    root_document: Option<String>,
    audio_extensions: Option<Vec<String>>,
    audio_path_marker: Option<String>,
    playback: Option<PlaybackSettings>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the application name used as the cache-name prefix.
    ///
    /// Default: `"cadence"`
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sets the cache generation.
    ///
    /// Default: `"v1"`
    pub fn cache_version(mut self, version: impl Into<String>) -> Self {
        self.cache_version = Some(version.into());
        self
    }

    /// Replaces the app-shell precache list.
    pub fn precache_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache_urls = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the offline navigation fallback document.
    ///
    /// Default: `"/"`
    pub fn root_document(mut self, url: impl Into<String>) -> Self {
        self.root_document = Some(url.into());
        self
    }

    /// Replaces the audio file-extension list. Entries are matched case-insensitively.
    pub fn audio_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audio_extensions = Some(
            extensions
                .into_iter()
                .map(|ext| ext.into().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        );
        self
    }

    pub fn audio_path_marker(mut self, marker: impl Into<String>) -> Self {
        self.audio_path_marker = Some(marker.into());
        self
    }

    pub fn playback(mut self, settings: PlaybackSettings) -> Self {
        self.playback = Some(settings);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the configuration, validating every field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with an actionable message when validation fails.
    pub fn build(self) -> Result<CoreConfig> {
        let app_name = self.app_name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        let cache_version = self
            .cache_version
            .unwrap_or_else(|| DEFAULT_CACHE_VERSION.to_string());
        let cache_names = CacheNames::derive(&app_name, &cache_version);

        let config = CoreConfig {
            precache_urls: self.precache_urls.unwrap_or_else(|| {
                DEFAULT_PRECACHE_URLS
                    .iter()
                    .map(|url| url.to_string())
                    .collect()
            }),
            root_document: self.root_document.unwrap_or_else(|| "/".to_string()),
            audio_extensions: self.audio_extensions.unwrap_or_else(|| {
                DEFAULT_AUDIO_EXTENSIONS
                    .iter()
                    .map(|ext| ext.to_string())
                    .collect()
            }),
            audio_path_marker: self
                .audio_path_marker
                .unwrap_or_else(|| DEFAULT_AUDIO_PATH_MARKER.to_string()),
            playback: self.playback.unwrap_or_default(),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(crate::events::DEFAULT_EVENT_BUFFER_SIZE),
            app_name,
            cache_version,
            cache_names,
        };

        config.validate()?;
        Ok(config)
    }
}
