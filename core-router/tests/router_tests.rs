mod common;

use bridge_traits::{
    CacheStorage, FetchRequest, FetchResponse, HttpMethod, RequestDestination, ResponseType,
};
use common::{body, test_config, RouterHarness};
use core_router::{RequestKind, RouterError};
use core_runtime::events::{CacheEvent, CoreEvent};

const SHELL: &str = "music-v2";
const AUDIO: &str = "music-audio-v2";
const OFFLINE: &str = "music-offline-audio";

fn cache_events(rx: &mut tokio::sync::broadcast::Receiver<CoreEvent>) -> Vec<CacheEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let CoreEvent::Cache(event) = event {
            events.push(event);
        }
    }
    events
}

#[test]
fn test_cache_names_follow_config() {
    let h = RouterHarness::new();
    let names = h.router.cache_names();
    assert_eq!(names.app_shell, SHELL);
    assert_eq!(names.audio, AUDIO);
    assert_eq!(names.offline_audio, OFFLINE);
    assert_eq!(
        h.router.classify(&FetchRequest::get("/songs/1.mp3")),
        RequestKind::Audio
    );
}

// ============================================================================
// Audio: cache-first, never auto-populated
// ============================================================================

#[tokio::test]
async fn test_offline_entry_served_without_network() {
    let h = RouterHarness::new();
    let url = "https://cdn.example/audio/7.mp3";
    h.seed(OFFLINE, url, "saved-bytes").await;
    h.fetcher.respond(url, FetchResponse::basic(200, "fresh-bytes"));

    let outcome = h.router.handle_fetch(&FetchRequest::get(url)).await.unwrap();

    assert_eq!(body(&outcome.response), "saved-bytes");
    assert!(outcome.revalidation.is_none());
    assert!(h.fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_automatic_audio_cache_checked_before_offline_cache() {
    let h = RouterHarness::new();
    let url = "https://cdn.example/track.ogg";
    h.seed(AUDIO, url, "automatic").await;
    h.seed(OFFLINE, url, "offline").await;

    let outcome = h.router.handle_fetch(&FetchRequest::get(url)).await.unwrap();

    assert_eq!(body(&outcome.response), "automatic");
    assert!(h.fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_audio_miss_is_fetched_but_not_stored() {
    let h = RouterHarness::new();
    let url = "https://cdn.example/stream/9";
    h.fetcher.respond(
        url,
        FetchResponse::basic(200, "network-bytes").with_response_type(ResponseType::Cors),
    );

    let request = FetchRequest::get(url).with_destination(RequestDestination::Audio);
    let outcome = h.router.handle_fetch(&request).await.unwrap();

    assert_eq!(body(&outcome.response), "network-bytes");
    assert_eq!(h.fetcher.calls(), vec![url.to_string()]);
    // Lookups must not create the caches either.
    assert!(!h.storage.has(AUDIO).await.unwrap());
    assert!(!h.storage.has(OFFLINE).await.unwrap());
    assert!(!h.storage.has(SHELL).await.unwrap());
}

#[tokio::test]
async fn test_audio_miss_offline_yields_503() {
    let h = RouterHarness::new();

    let outcome = h
        .router
        .handle_fetch(&FetchRequest::get("https://cdn.example/gone.MP3?sig=1"))
        .await
        .unwrap();

    assert_eq!(outcome.response.status, 503);
    assert_eq!(outcome.response.status_text, "Audio not available offline");
    assert_eq!(outcome.response.response_type, ResponseType::Default);
}

// ============================================================================
// Navigation: network-first with shell fallback
// ============================================================================

#[tokio::test]
async fn test_navigation_success_refreshes_shell() {
    let h = RouterHarness::new();
    let url = "https://app.example/playlists/3";
    h.seed(SHELL, url, "old page").await;
    h.fetcher.respond(url, FetchResponse::basic(200, "new page"));

    let outcome = h
        .router
        .handle_fetch(&FetchRequest::navigate(url))
        .await
        .unwrap();

    assert_eq!(body(&outcome.response), "new page");
    let cached = h.cached(SHELL, url).await.unwrap();
    assert_eq!(body(&cached), "new page");
}

#[tokio::test]
async fn test_navigation_error_status_is_returned_but_not_stored() {
    let h = RouterHarness::new();
    let url = "https://app.example/missing";
    h.fetcher.respond(url, FetchResponse::basic(404, "not found"));

    let outcome = h
        .router
        .handle_fetch(&FetchRequest::navigate(url))
        .await
        .unwrap();

    assert_eq!(outcome.response.status, 404);
    assert!(h.cached(SHELL, url).await.is_none());
}

#[tokio::test]
async fn test_offline_navigation_prefers_exact_match() {
    let h = RouterHarness::new();
    let url = "https://app.example/library";
    h.seed(SHELL, "/", "shell").await;
    h.seed(SHELL, url, "library page").await;

    let outcome = h
        .router
        .handle_fetch(&FetchRequest::navigate(url))
        .await
        .unwrap();

    assert_eq!(body(&outcome.response), "library page");
}

#[tokio::test]
async fn test_offline_navigation_falls_back_to_root_document() {
    let h = RouterHarness::new();
    h.seed(SHELL, "/", "shell").await;

    let outcome = h
        .router
        .handle_fetch(&FetchRequest::navigate("https://app.example/artist/12"))
        .await
        .unwrap();

    assert_eq!(outcome.response.status, 200);
    assert_eq!(body(&outcome.response), "shell");
}

#[tokio::test]
async fn test_offline_navigation_with_empty_cache_is_503() {
    let h = RouterHarness::new();

    let outcome = h
        .router
        .handle_fetch(&FetchRequest::navigate("https://app.example/"))
        .await
        .unwrap();

    assert_eq!(outcome.response.status, 503);
    assert_eq!(body(&outcome.response), "Offline");
}

// ============================================================================
// Static: stale-while-revalidate
// ============================================================================

#[tokio::test]
async fn test_stale_served_while_slow_network_revalidates() {
    let h = RouterHarness::new();
    let url = "/assets/app.js";
    h.seed(SHELL, url, "v1 bundle").await;
    h.fetcher.respond(url, FetchResponse::basic(200, "v2 bundle"));
    let gate = h.fetcher.slow_down();

    let outcome = h.router.handle_fetch(&FetchRequest::get(url)).await.unwrap();
    assert_eq!(body(&outcome.response), "v1 bundle");
    assert!(outcome.revalidation.is_some());

    gate.notify_one();
    let served = outcome.settle().await;
    assert_eq!(body(&served), "v1 bundle");

    let next = h.router.handle_fetch(&FetchRequest::get(url)).await.unwrap();
    assert_eq!(body(&next.response), "v2 bundle");
}

#[tokio::test]
async fn test_revalidation_skips_non_basic_responses() {
    let h = RouterHarness::new();
    let url = "https://fonts.example/inter.woff2";
    h.seed(SHELL, url, "cached font").await;
    h.fetcher.respond(
        url,
        FetchResponse::basic(200, "opaque font").with_response_type(ResponseType::Opaque),
    );

    h.router
        .handle_fetch(&FetchRequest::get(url))
        .await
        .unwrap()
        .settle()
        .await;

    assert_eq!(body(&h.cached(SHELL, url).await.unwrap()), "cached font");
}

#[tokio::test]
async fn test_failed_revalidation_is_reported_not_raised() {
    let h = RouterHarness::new();
    let mut rx = h.bus.subscribe();
    let url = "/assets/style.css?v=3";
    h.seed(SHELL, url, "cached css").await;

    let outcome = h.router.handle_fetch(&FetchRequest::get(url)).await.unwrap();
    let served = outcome.settle().await;

    assert_eq!(body(&served), "cached css");
    assert_eq!(body(&h.cached(SHELL, url).await.unwrap()), "cached css");
    let events = cache_events(&mut rx);
    assert!(matches!(
        events.as_slice(),
        [CacheEvent::RevalidationFailed { url, .. }] if url == "/assets/style.css"
    ));
}

#[tokio::test]
async fn test_static_miss_awaits_network_and_stores_basic_200() {
    let h = RouterHarness::new();
    h.fetcher
        .respond("/icons/logo.svg", FetchResponse::basic(200, "<svg/>"));
    h.fetcher.respond(
        "https://cdn.example/lib.js",
        FetchResponse::basic(200, "lib").with_response_type(ResponseType::Cors),
    );

    let own = h
        .router
        .handle_fetch(&FetchRequest::get("/icons/logo.svg"))
        .await
        .unwrap();
    let foreign = h
        .router
        .handle_fetch(&FetchRequest::get("https://cdn.example/lib.js"))
        .await
        .unwrap();

    assert!(own.revalidation.is_none());
    assert_eq!(body(&foreign.response), "lib");
    assert!(h.cached(SHELL, "/icons/logo.svg").await.is_some());
    assert!(h.cached(SHELL, "https://cdn.example/lib.js").await.is_none());
}

#[tokio::test]
async fn test_static_miss_offline_surfaces_error() {
    let h = RouterHarness::new();

    let err = h
        .router
        .handle_fetch(&FetchRequest::get("/api/songs?token=secret"))
        .await
        .unwrap_err();

    assert!(err.is_network_error());
    match err {
        RouterError::Network { url, .. } => assert_eq!(url, "/api/songs"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_get_bypasses_shell_cache() {
    let h = RouterHarness::new();
    let url = "/api/songs/7/like";
    h.seed(SHELL, url, "cached GET body").await;
    h.fetcher.respond(url, FetchResponse::basic(200, "POST result"));

    let post = FetchRequest::get(url).with_method(HttpMethod::Post);
    let outcome = h.router.handle_fetch(&post).await.unwrap();

    assert_eq!(body(&outcome.response), "POST result");
    assert!(outcome.revalidation.is_none());
    assert_eq!(h.fetcher.calls(), vec![url.to_string()]);
    assert_eq!(body(&h.cached(SHELL, url).await.unwrap()), "cached GET body");
}

#[tokio::test]
async fn test_non_get_network_failure_surfaces() {
    let h = RouterHarness::new();
    h.seed(SHELL, "/api/playlists", "cached list").await;

    let delete = FetchRequest::get("/api/playlists?id=4").with_method(HttpMethod::Delete);
    let err = h.router.handle_fetch(&delete).await.unwrap_err();

    assert!(matches!(err, RouterError::Network { ref url, .. } if url == "/api/playlists"));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_install_precaches_shell_and_skips_waiting() {
    let h = RouterHarness::new();
    let mut rx = h.bus.subscribe();
    for url in &h.config.precache_urls {
        h.fetcher
            .respond(url, FetchResponse::basic(200, format!("body of {url}")));
    }

    let precached = h.router.install().await.unwrap();

    assert_eq!(precached, 3);
    assert_eq!(h.storage.get(SHELL).unwrap().len(), 3);
    assert_eq!(
        body(&h.cached(SHELL, "/manifest.json").await.unwrap()),
        "body of /manifest.json"
    );
    assert_eq!(h.worker.skip_waiting_calls(), 1);
    assert_eq!(
        cache_events(&mut rx),
        vec![CacheEvent::Installed {
            cache_name: SHELL.to_string(),
            precached: 3,
        }]
    );
}

#[tokio::test]
async fn test_install_is_all_or_nothing() {
    let h = RouterHarness::new();
    h.fetcher.respond("/", FetchResponse::basic(200, "shell"));
    h.fetcher
        .respond("/manifest.json", FetchResponse::basic(200, "{}"));
    // Icon is unreachable.

    let err = h.router.install().await.unwrap_err();

    assert!(matches!(err, RouterError::Precache { ref url, .. } if url == "/icons/icon-192.png"));
    assert!(!h.storage.has(SHELL).await.unwrap());
    assert_eq!(h.worker.skip_waiting_calls(), 0);
}

#[tokio::test]
async fn test_install_rejects_error_status() {
    let h = RouterHarness::new();
    h.fetcher.respond("/", FetchResponse::basic(200, "shell"));
    h.fetcher
        .respond("/manifest.json", FetchResponse::basic(500, "boom"));
    h.fetcher
        .respond("/icons/icon-192.png", FetchResponse::basic(200, "png"));

    let err = h.router.install().await.unwrap_err();

    match err {
        RouterError::Precache { url, reason } => {
            assert_eq!(url, "/manifest.json");
            assert!(reason.contains("500"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!h.storage.has(SHELL).await.unwrap());
}

#[tokio::test]
async fn test_activate_deletes_only_stale_generations() {
    let h = RouterHarness::new();
    let mut rx = h.bus.subscribe();
    for name in [
        "music-v1",
        AUDIO,
        "music-audio-v2-custom",
        SHELL,
        OFFLINE,
    ] {
        h.storage.open(name).await.unwrap();
    }

    let purged = h.router.activate().await.unwrap();

    assert_eq!(purged, vec!["music-v1", "music-audio-v2-custom"]);
    assert_eq!(h.storage.keys().await.unwrap(), vec![AUDIO, SHELL, OFFLINE]);
    assert_eq!(h.worker.claim_calls(), 1);
    assert_eq!(
        cache_events(&mut rx),
        vec![CacheEvent::Activated { purged }]
    );
}

#[tokio::test]
async fn test_version_bump_keeps_offline_tracks() {
    let old = RouterHarness::with_config(test_config("music", "v1"));
    let track = "https://cdn.example/audio/1.mp3";
    old.seed(OFFLINE, track, "saved").await;
    old.seed("music-v1", "/", "old shell").await;
    old.seed("music-audio-v1", track, "auto").await;

    let new = RouterHarness::with_config(test_config("music", "v2"));
    let storage = old.storage.clone();
    let router = core_router::CacheRouter::new(
        &new.config,
        new.fetcher.clone(),
        storage.clone(),
        new.worker.clone(),
    );

    let purged = router.purge_stale().await.unwrap();

    assert_eq!(purged, vec!["music-v1", "music-audio-v1"]);
    assert_eq!(storage.keys().await.unwrap(), vec![OFFLINE]);
    let outcome = router.handle_fetch(&FetchRequest::get(track)).await.unwrap();
    assert_eq!(body(&outcome.response), "saved");
}

#[tokio::test]
async fn test_activate_with_nothing_stale() {
    let h = RouterHarness::new();
    h.storage.open(SHELL).await.unwrap();

    assert!(h.router.activate().await.unwrap().is_empty());
    assert_eq!(h.storage.keys().await.unwrap(), vec![SHELL]);
}
