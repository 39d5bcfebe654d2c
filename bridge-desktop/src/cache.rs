//! In-memory Cache Storage

use async_trait::async_trait;
use bridge_traits::{
    cache::{Cache, CacheStorage},
    error::{BridgeError, Result},
    fetch::{FetchRequest, FetchResponse, HttpMethod},
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// One named in-memory cache. Writes to the same key are last-write-wins.
///
/// Only `GET` requests are stored or matched.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<BTreeMap<String, FetchResponse>>,
}

impl MemoryCache {
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn match_request(&self, request: &FetchRequest) -> Result<Option<FetchResponse>> {
        if request.method != HttpMethod::Get {
            return Ok(None);
        }
        Ok(self.entries.read().get(request.cache_key()).cloned())
    }

    async fn put(&self, request: &FetchRequest, response: FetchResponse) -> Result<()> {
        if request.method != HttpMethod::Get {
            return Err(BridgeError::OperationFailed(format!(
                "Only GET requests can be cached, got {:?}",
                request.method
            )));
        }
        self.entries
            .write()
            .insert(request.cache_key().to_string(), response);
        Ok(())
    }

    async fn delete(&self, request: &FetchRequest) -> Result<bool> {
        Ok(self.entries.write().remove(request.cache_key()).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

/// In-process registry of named caches.
///
/// Cache names are listed in creation order. Deleting a name detaches it:
/// handles opened earlier keep working but are no longer reachable by name.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<Vec<(String, Arc<MemoryCache>)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed handle to an existing cache, for inspection in tests and tools.
    pub fn get(&self, name: &str) -> Option<Arc<MemoryCache>> {
        self.caches
            .read()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, cache)| Arc::clone(cache))
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>> {
        if let Some(cache) = self.get(name) {
            return Ok(cache);
        }

        let mut caches = self.caches.write();
        // Another caller may have created it between the read and the write.
        if let Some((_, cache)) = caches.iter().find(|(existing, _)| existing == name) {
            return Ok(Arc::clone(cache) as Arc<dyn Cache>);
        }
        let cache = Arc::new(MemoryCache::default());
        caches.push((name.to_string(), Arc::clone(&cache)));
        debug!(cache = name, "Created cache");
        Ok(cache)
    }

    async fn has(&self, name: &str) -> Result<bool> {
        Ok(self.get(name).is_some())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut caches = self.caches.write();
        let before = caches.len();
        caches.retain(|(existing, _)| existing != name);
        let removed = caches.len() != before;
        if removed {
            debug!(cache = name, "Deleted cache");
        }
        Ok(removed)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .caches
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }
}
