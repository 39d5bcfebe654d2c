//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (network, cache
//! storage, audio output, media session, worker scope) into the shared Rust
//! core. Every service is constructed exactly once by [`CoreService::bootstrap`]
//! and handed out as an `Arc`; there is no ambient global state.
//!
//! Desktop hosts typically enable the `desktop-shims` feature (on by default),
//! which provides [`CoreDependencies::desktop`] backed by `bridge-desktop`.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use bridge_traits::{
    AudioElementFactory, CacheStorage, Clock, Fetcher, MediaSessionPort, SystemClock, WorkerScope,
};
use core_playback::{OfflineAudioCache, PlaybackSessionManager, SessionBackend};
use core_router::CacheRouter;
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub fetcher: Arc<dyn Fetcher>,
    pub cache_storage: Arc<dyn CacheStorage>,
    pub worker_scope: Arc<dyn WorkerScope>,
    pub audio_elements: Arc<dyn AudioElementFactory>,
    pub backend: Arc<dyn SessionBackend>,
    pub clock: Arc<dyn Clock>,
    pub media_session: Option<Arc<dyn MediaSessionPort>>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    ///
    /// The clock defaults to the system clock and no media session is wired.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        cache_storage: Arc<dyn CacheStorage>,
        worker_scope: Arc<dyn WorkerScope>,
        audio_elements: Arc<dyn AudioElementFactory>,
        backend: Arc<dyn SessionBackend>,
    ) -> Self {
        Self {
            fetcher,
            cache_storage,
            worker_scope,
            audio_elements,
            backend,
            clock: Arc::new(SystemClock),
            media_session: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_media_session(mut self, port: Arc<dyn MediaSessionPort>) -> Self {
        self.media_session = Some(port);
        self
    }
}

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
impl CoreDependencies {
    /// Native bundle: reqwest networking resolved against `base_url`,
    /// in-memory cache storage and an in-process worker scope.
    pub fn desktop(
        base_url: &str,
        audio_elements: Arc<dyn AudioElementFactory>,
        backend: Arc<dyn SessionBackend>,
    ) -> Result<Self> {
        use bridge_desktop::{DesktopWorkerScope, MemoryCacheStorage, ReqwestFetcher};

        let fetcher = ReqwestFetcher::new()?.with_base_url(base_url)?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(MemoryCacheStorage::new()),
            Arc::new(DesktopWorkerScope::new()),
            audio_elements,
            backend,
        ))
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    event_bus: EventBus,
    session: Arc<PlaybackSessionManager>,
    router: Arc<CacheRouter>,
    offline_cache: Arc<OfflineAudioCache>,
}

impl CoreService {
    /// Validate `config` and construct every service once.
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] when the configuration is rejected.
    pub fn bootstrap(config: CoreConfig, deps: CoreDependencies) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);

        let mut session = PlaybackSessionManager::new(
            config.playback.clone(),
            deps.backend,
            deps.audio_elements,
            deps.clock,
        )
        .with_event_bus(event_bus.clone());
        if let Some(port) = deps.media_session {
            session = session.with_media_session(port);
        }

        let router = CacheRouter::new(
            &config,
            Arc::clone(&deps.fetcher),
            Arc::clone(&deps.cache_storage),
            deps.worker_scope,
        )
        .with_event_bus(event_bus.clone());

        let offline_cache =
            OfflineAudioCache::new(deps.cache_storage, deps.fetcher, config.cache_names())
                .with_event_bus(event_bus.clone());

        info!(
            app_shell = %config.cache_names().app_shell,
            audio = %config.cache_names().audio,
            offline_audio = %config.cache_names().offline_audio,
            "Core services initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            event_bus,
            session: Arc::new(session),
            router: Arc::new(router),
            offline_cache: Arc::new(offline_cache),
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn session(&self) -> Arc<PlaybackSessionManager> {
        Arc::clone(&self.session)
    }

    pub fn router(&self) -> Arc<CacheRouter> {
        Arc::clone(&self.router)
    }

    pub fn offline_cache(&self) -> Arc<OfflineAudioCache> {
        Arc::clone(&self.offline_cache)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to every event published by the core services.
    pub fn events(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
    }

    /// Start the periodic listening-time flush. Requires a tokio runtime.
    pub fn start_flush_timer(&self) -> JoinHandle<()> {
        self.session.spawn_flush_timer()
    }
}
