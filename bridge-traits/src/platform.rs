//! Platform-specific helper abstractions used to keep trait bounds aligned with
//! the threading guarantees of each target.
//!
//! Native targets require `Send + Sync` so bridge implementations can be shared
//! across tokio tasks. A browser main thread or service-worker context is
//! single threaded and its handles (audio elements, media session) are not
//! thread-safe, so the bound collapses to nothing on `wasm32`.

/// Marker trait that applies `Send + Sync` on native targets while becoming a
/// no-op on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use crate::{
        AudioElement, Cache, CacheStorage, FetchRequest, Fetcher, MediaSessionPort, WorkerScope,
    };

    fn assert_send_sync<T: Send + Sync + ?Sized>() {}

    fn assert_send<T: Send>(_: &T) {}

    #[allow(dead_code)]
    fn bridge_futures_are_send(
        fetcher: &dyn Fetcher,
        storage: &dyn CacheStorage,
        request: &FetchRequest,
    ) {
        assert_send(&fetcher.fetch(request));
        assert_send(&storage.open("shell"));
    }

    #[test]
    fn test_bridge_objects_are_thread_safe_natively() {
        assert_send_sync::<dyn Fetcher>();
        assert_send_sync::<dyn Cache>();
        assert_send_sync::<dyn CacheStorage>();
        assert_send_sync::<dyn WorkerScope>();
        assert_send_sync::<dyn AudioElement>();
        assert_send_sync::<dyn MediaSessionPort>();
    }
}
