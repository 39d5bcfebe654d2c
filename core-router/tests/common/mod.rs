//! Scripted network and storage fixtures for router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_desktop::{DesktopWorkerScope, MemoryCacheStorage};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{Cache, CacheStorage, FetchRequest, FetchResponse, Fetcher};
use core_router::CacheRouter;
use core_runtime::config::CoreConfig;
use core_runtime::events::EventBus;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

/// Fetcher answering from a per-URL script. Unscripted URLs fail as if offline.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, FetchResponse>>,
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: FetchResponse) {
        self.routes.lock().insert(url.to_string(), response);
    }

    pub fn go_offline(&self, url: &str) {
        self.routes.lock().remove(url);
    }

    /// Park every subsequent fetch until the returned gate is notified.
    pub fn slow_down(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &FetchRequest) -> BridgeResult<FetchResponse> {
        self.calls.lock().push(request.url.clone());

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.routes
            .lock()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| BridgeError::Network(format!("offline: {}", request.url)))
    }
}

pub struct RouterHarness {
    pub config: CoreConfig,
    pub fetcher: Arc<ScriptedFetcher>,
    pub storage: Arc<MemoryCacheStorage>,
    pub worker: Arc<DesktopWorkerScope>,
    pub bus: EventBus,
    pub router: CacheRouter,
}

impl RouterHarness {
    pub fn new() -> Self {
        Self::with_config(test_config("music", "v2"))
    }

    pub fn with_config(config: CoreConfig) -> Self {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let storage = Arc::new(MemoryCacheStorage::new());
        let worker = Arc::new(DesktopWorkerScope::new());
        let bus = EventBus::new(32);
        let router = CacheRouter::new(
            &config,
            fetcher.clone(),
            storage.clone(),
            worker.clone(),
        )
        .with_event_bus(bus.clone());

        Self {
            config,
            fetcher,
            storage,
            worker,
            bus,
            router,
        }
    }

    /// Seed `cache` with `body` for `url`.
    pub async fn seed(&self, cache: &str, url: &str, body: &'static str) {
        self.storage
            .open(cache)
            .await
            .unwrap()
            .put(&FetchRequest::get(url), FetchResponse::basic(200, body))
            .await
            .unwrap();
    }

    pub async fn cached(&self, cache: &str, url: &str) -> Option<FetchResponse> {
        let cache = self.storage.get(cache)?;
        cache.match_url(url).await.unwrap()
    }
}

pub fn test_config(app: &str, version: &str) -> CoreConfig {
    CoreConfig::builder()
        .app_name(app)
        .cache_version(version)
        .precache_urls(["/", "/manifest.json", "/icons/icon-192.png"])
        .build()
        .unwrap()
}

pub fn body(response: &FetchResponse) -> String {
    String::from_utf8(response.body.to_vec()).unwrap()
}
