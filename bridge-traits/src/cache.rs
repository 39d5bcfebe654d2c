//! Cache Storage Abstractions
//!
//! A named set of request/response caches, modelled on the browser
//! Cache-Storage API. Each [`Cache`] is a key-value store keyed by
//! [`FetchRequest::cache_key`]; concurrent writes to the same key are
//! last-write-wins. Only `GET` requests are cacheable.
//!
//! - Web: `caches` global inside the service worker and document
//! - Desktop: in-memory store from `bridge-desktop`

use std::sync::Arc;

use crate::error::Result;
use crate::fetch::{FetchRequest, FetchResponse};
use crate::platform::PlatformSendSync;

/// A single named cache bucket.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait Cache: PlatformSendSync {
    /// Look up the stored response for `request`.
    async fn match_request(&self, request: &FetchRequest) -> Result<Option<FetchResponse>>;

    /// Store `response` for `request`, replacing any previous entry.
    /// Fails for non-`GET` requests.
    async fn put(&self, request: &FetchRequest, response: FetchResponse) -> Result<()>;

    /// Remove the entry for `request`. Returns `true` if something was removed.
    async fn delete(&self, request: &FetchRequest) -> Result<bool>;

    /// List the keys of every stored entry.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Convenience lookup for a plain `GET` of `url`.
    async fn match_url(&self, url: &str) -> Result<Option<FetchResponse>> {
        self.match_request(&FetchRequest::get(url)).await
    }
}

/// Registry of named caches.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::cache::CacheStorage;
///
/// async fn purge(storage: &dyn CacheStorage, keep: &[&str]) -> Result<()> {
///     for name in storage.keys().await? {
///         if !keep.contains(&name.as_str()) {
///             storage.delete(&name).await?;
///         }
///     }
///     Ok(())
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait CacheStorage: PlatformSendSync {
    /// Open the cache called `name`, creating it if it does not exist.
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>>;

    /// Check whether a cache called `name` exists without creating it.
    async fn has(&self, name: &str) -> Result<bool>;

    /// Delete the cache called `name`. Returns `true` if it existed.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// List the names of all existing caches.
    async fn keys(&self) -> Result<Vec<String>>;
}
