use async_trait::async_trait;
use bridge_desktop::MemoryCacheStorage;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{CacheStorage, FetchRequest, FetchResponse, Fetcher, RequestDestination};
use core_playback::{OfflineAudioCache, PlaybackError};
use core_runtime::config::CacheNames;
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct StubFetcher {
    routes: Mutex<HashMap<String, FetchResponse>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StubFetcher {
    fn respond(&self, url: &str, status: u16, body: &'static str) {
        self.routes
            .lock()
            .insert(url.to_string(), FetchResponse::basic(status, body));
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> BridgeResult<FetchResponse> {
        self.requests.lock().push(request.clone());
        self.routes
            .lock()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| BridgeError::Network("connection reset".to_string()))
    }
}

struct Fixture {
    names: CacheNames,
    fetcher: Arc<StubFetcher>,
    storage: Arc<MemoryCacheStorage>,
    bus: EventBus,
    cache: OfflineAudioCache,
}

fn fixture() -> Fixture {
    let names = CacheNames::derive("cadence", "v1");
    let fetcher = Arc::new(StubFetcher::default());
    let storage = Arc::new(MemoryCacheStorage::new());
    let bus = EventBus::new(16);
    let cache = OfflineAudioCache::new(storage.clone(), fetcher.clone(), &names)
        .with_event_bus(bus.clone());
    Fixture {
        names,
        fetcher,
        storage,
        bus,
        cache,
    }
}

const TRACK: &str = "https://cdn.example/audio/1.mp3?sig=abc";

#[tokio::test]
async fn test_cache_writes_only_to_offline_name() {
    let f = fixture();
    f.fetcher.respond(TRACK, 200, "audio-bytes");

    f.cache.cache(TRACK).await.unwrap();

    assert_eq!(f.cache.cache_name(), "cadence-offline-audio");
    assert_ne!(f.cache.cache_name(), f.names.audio);
    assert_eq!(
        f.storage.keys().await.unwrap(),
        vec![f.names.offline_audio.clone()]
    );
    assert!(f.cache.is_cached(TRACK).await.unwrap());
    assert_eq!(
        f.cache.read(TRACK).await.unwrap().unwrap().as_ref(),
        b"audio-bytes"
    );

    let sent = f.fetcher.requests.lock().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].destination, RequestDestination::Audio);
}

#[tokio::test]
async fn test_empty_url_is_rejected_without_fetching() {
    let f = fixture();

    let err = f.cache.cache("  ").await.unwrap_err();

    assert!(matches!(err, PlaybackError::InvalidUrl(_)));
    assert!(f.fetcher.requests.lock().is_empty());
}

#[tokio::test]
async fn test_transport_failure_surfaces() {
    let f = fixture();

    let err = f.cache.cache(TRACK).await.unwrap_err();

    assert!(err.is_network_error());
    assert!(!f.cache.is_cached(TRACK).await.unwrap());
}

#[tokio::test]
async fn test_error_status_surfaces_and_stores_nothing() {
    let f = fixture();
    f.fetcher.respond(TRACK, 403, "expired signature");

    let err = f.cache.cache(TRACK).await.unwrap_err();

    match err {
        PlaybackError::DownloadFailed { status, .. } => assert_eq!(status, 403),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!f.storage.has(&f.names.offline_audio).await.unwrap());
}

#[tokio::test]
async fn test_lookups_do_not_create_cache() {
    let f = fixture();

    assert!(!f.cache.is_cached(TRACK).await.unwrap());
    assert!(f.cache.read(TRACK).await.unwrap().is_none());
    assert!(f.cache.cached_urls().await.unwrap().is_empty());
    assert!(f.cache.usage().await.unwrap().is_empty());
    assert!(!f.cache.remove(TRACK).await.unwrap());
    assert!(f.storage.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_and_inventory() {
    let f = fixture();
    let other = "https://cdn.example/audio/0.mp3";
    f.fetcher.respond(TRACK, 200, "12345678");
    f.fetcher.respond(other, 200, "1234");
    f.cache.cache(TRACK).await.unwrap();
    f.cache.cache(other).await.unwrap();

    assert_eq!(
        f.cache.cached_urls().await.unwrap(),
        vec![other.to_string(), TRACK.to_string()]
    );
    let usage = f.cache.usage().await.unwrap();
    assert_eq!(usage.entries, 2);
    assert_eq!(usage.total_bytes, 12);
    assert_eq!(usage.average_entry_size(), 6);

    assert!(f.cache.remove(TRACK).await.unwrap());
    assert!(!f.cache.remove(TRACK).await.unwrap());
    assert!(!f.cache.is_cached(TRACK).await.unwrap());
    assert!(f.cache.is_cached(other).await.unwrap());
}

#[tokio::test]
async fn test_clear_all_drops_cache_and_reports() {
    let f = fixture();
    let mut rx = f.bus.subscribe();
    f.fetcher.respond(TRACK, 200, "abc");
    f.cache.cache(TRACK).await.unwrap();

    f.cache.clear_all().await.unwrap();
    // Clearing an absent cache is fine.
    f.cache.clear_all().await.unwrap();

    assert!(!f.storage.has(&f.names.offline_audio).await.unwrap());
    assert!(!f.cache.is_cached(TRACK).await.unwrap());

    let mut events = Vec::new();
    while let Ok(CoreEvent::Cache(event)) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            CacheEvent::OfflineTrackCached {
                url: TRACK.to_string(),
                bytes: 3,
            },
            CacheEvent::OfflineCacheCleared,
            CacheEvent::OfflineCacheCleared,
        ]
    );
}
