//! # Cache Router
//!
//! Request interception for the service-worker context. Each request is
//! classified once and served by exactly one strategy:
//!
//! | Kind | Strategy | Writes |
//! |------|----------|--------|
//! | Audio | cache-first (audio, then offline-audio) | never |
//! | Navigation | network-first, shell fallback | app shell on 200 |
//! | Static | stale-while-revalidate | app shell on 200 + basic |
//!
//! Only `GET` requests touch the caches; other methods go straight to the
//! network.
//!
//! Fallbacks never reject: offline audio yields a synthetic 503, offline
//! navigation yields the cached shell (or a synthetic 503 when nothing is
//! cached). Only a static request with no cached copy and a failing network
//! surfaces an error.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use bridge_traits::{
    CacheStorage, FetchRequest, FetchResponse, Fetcher, HttpMethod, ResponseType, WorkerScope,
};
use core_runtime::config::{CacheNames, CoreConfig};
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use core_runtime::logging::strip_url_query;

use crate::classify::{RequestClassifier, RequestKind};
use crate::error::{RouterError, Result};

const AUDIO_OFFLINE_TEXT: &str = "Audio not available offline";
const OFFLINE_TEXT: &str = "Offline";

/// Response to hand back to the client, plus any background work it started.
///
/// Hosts with a "wait until" facility should keep the worker alive until
/// `revalidation` finishes.
#[derive(Debug)]
pub struct FetchOutcome {
    pub response: FetchResponse,
    pub revalidation: Option<JoinHandle<()>>,
}

impl FetchOutcome {
    pub(crate) fn immediate(response: FetchResponse) -> Self {
        Self {
            response,
            revalidation: None,
        }
    }

    /// Wait for background revalidation, then return the response.
    pub async fn settle(self) -> FetchResponse {
        if let Some(handle) = self.revalidation {
            if let Err(err) = handle.await {
                warn!(error = %err, "Revalidation task did not complete");
            }
        }
        self.response
    }
}

/// Classifies intercepted requests and applies the matching caching strategy.
pub struct CacheRouter {
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) storage: Arc<dyn CacheStorage>,
    pub(crate) worker: Arc<dyn WorkerScope>,
    pub(crate) names: CacheNames,
    pub(crate) classifier: RequestClassifier,
    pub(crate) precache_urls: Vec<String>,
    pub(crate) root_document: String,
    pub(crate) event_bus: Option<EventBus>,
}

impl CacheRouter {
    pub fn new(
        config: &CoreConfig,
        fetcher: Arc<dyn Fetcher>,
        storage: Arc<dyn CacheStorage>,
        worker: Arc<dyn WorkerScope>,
    ) -> Self {
        Self {
            fetcher,
            storage,
            worker,
            names: config.cache_names().clone(),
            classifier: RequestClassifier::from_config(config),
            precache_urls: config.precache_urls.clone(),
            root_document: config.root_document.clone(),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Current cache names; every other name is stale.
    pub fn cache_names(&self) -> &CacheNames {
        &self.names
    }

    pub fn classify(&self, request: &FetchRequest) -> RequestKind {
        self.classifier.classify(request)
    }

    /// Serve one intercepted request.
    ///
    /// # Errors
    ///
    /// [`RouterError::Network`] when a static request has no cached copy and
    /// the network fails, or when a non-`GET` request fails. Audio and
    /// navigation `GET` requests always resolve.
    #[instrument(skip(self, request), fields(url = %strip_url_query(&request.url)))]
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        if request.method != HttpMethod::Get {
            debug!(method = ?request.method, "Passing non-GET request through");
            return self.pass_through(request).await;
        }

        let kind = self.classify(request);
        debug!(?kind, "Intercepted request");

        match kind {
            RequestKind::Audio => Ok(FetchOutcome::immediate(self.serve_audio(request).await)),
            RequestKind::Navigation => {
                Ok(FetchOutcome::immediate(self.serve_navigation(request).await))
            }
            RequestKind::Static => self.serve_static(request).await,
        }
    }

    // ========================================================================
    // Strategies
    // ========================================================================

    /// Cache-first over the automatic audio cache, then the offline cache.
    /// Network responses are passed through without being stored.
    async fn serve_audio(&self, request: &FetchRequest) -> FetchResponse {
        for name in [&self.names.audio, &self.names.offline_audio] {
            if let Some(hit) = self.lookup(name, request).await {
                debug!(cache = %name, "Audio served from cache");
                return hit;
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Audio unavailable offline");
                FetchResponse::synthetic(503, AUDIO_OFFLINE_TEXT, AUDIO_OFFLINE_TEXT)
            }
        }
    }

    /// Network-first; 200 responses refresh the shell copy.
    async fn serve_navigation(&self, request: &FetchRequest) -> FetchResponse {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.status == 200 {
                    self.store(&self.names.app_shell, request, response.clone())
                        .await;
                }
                response
            }
            Err(err) => {
                warn!(error = %err, "Navigation failed, falling back to app shell");
                if let Some(hit) = self.lookup(&self.names.app_shell, request).await {
                    return hit;
                }
                let root = FetchRequest::get(self.root_document.as_str());
                if let Some(shell) = self.lookup(&self.names.app_shell, &root).await {
                    return shell;
                }
                FetchResponse::synthetic(503, OFFLINE_TEXT, OFFLINE_TEXT)
            }
        }
    }

    /// Network only; caches hold GET responses exclusively.
    async fn pass_through(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        let response = self
            .fetcher
            .fetch(request)
            .await
            .map_err(|source| RouterError::Network {
                url: strip_url_query(&request.url).to_string(),
                source,
            })?;
        Ok(FetchOutcome::immediate(response))
    }

    /// Stale-while-revalidate over the app-shell cache.
    async fn serve_static(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        if let Some(hit) = self.lookup(&self.names.app_shell, request).await {
            let revalidation = tokio::spawn(revalidate(
                Arc::clone(&self.fetcher),
                Arc::clone(&self.storage),
                self.names.app_shell.clone(),
                self.event_bus.clone(),
                request.clone(),
            ));
            return Ok(FetchOutcome {
                response: hit,
                revalidation: Some(revalidation),
            });
        }

        let response = self
            .fetcher
            .fetch(request)
            .await
            .map_err(|source| RouterError::Network {
                url: strip_url_query(&request.url).to_string(),
                source,
            })?;
        if is_cacheable(&response) {
            self.store(&self.names.app_shell, request, response.clone())
                .await;
        }
        Ok(FetchOutcome::immediate(response))
    }

    // ========================================================================
    // Cache helpers
    // ========================================================================

    /// Look up `request` in cache `name` without creating the cache.
    /// Storage errors are logged and treated as a miss.
    pub(crate) async fn lookup(&self, name: &str, request: &FetchRequest) -> Option<FetchResponse> {
        let result = async {
            if !self.storage.has(name).await? {
                return Ok(None);
            }
            self.storage.open(name).await?.match_request(request).await
        }
        .await;

        result.unwrap_or_else(|err: bridge_traits::BridgeError| {
            warn!(cache = name, error = %err, "Cache lookup failed");
            None
        })
    }

    async fn store(&self, name: &str, request: &FetchRequest, response: FetchResponse) {
        let result = async { self.storage.open(name).await?.put(request, response).await }.await;
        if let Err(err) = result {
            warn!(cache = name, error = %err, "Cache write failed");
        }
    }

    pub(crate) fn emit(&self, event: CacheEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Cache(event)).ok();
        }
    }
}

/// Only complete same-origin responses are kept.
fn is_cacheable(response: &FetchResponse) -> bool {
    response.status == 200 && response.response_type == ResponseType::Basic
}

/// Background half of stale-while-revalidate. Failures are reported, never raised.
async fn revalidate(
    fetcher: Arc<dyn Fetcher>,
    storage: Arc<dyn CacheStorage>,
    cache_name: String,
    event_bus: Option<EventBus>,
    request: FetchRequest,
) {
    let url = strip_url_query(&request.url).to_string();
    let outcome = async {
        let response = fetcher.fetch(&request).await?;
        if is_cacheable(&response) {
            storage.open(&cache_name).await?.put(&request, response).await?;
            debug!(url = %url, "Revalidated cached resource");
        }
        Ok::<_, bridge_traits::BridgeError>(())
    }
    .await;

    if let Err(err) = outcome {
        debug!(url = %url, error = %err, "Background revalidation failed");
        if let Some(bus) = event_bus {
            bus.emit(CoreEvent::Cache(CacheEvent::RevalidationFailed {
                url,
                message: err.to_string(),
            }))
            .ok();
        }
    }
}
