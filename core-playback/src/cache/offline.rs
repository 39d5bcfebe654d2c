//! Opt-in offline audio cache.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, instrument, warn};

use bridge_traits::{CacheStorage, FetchRequest, Fetcher, RequestDestination};
use core_runtime::config::CacheNames;
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};

use crate::cache::stats::OfflineCacheUsage;
use crate::error::{PlaybackError, Result};

/// User-populated store of audio responses keyed by exact URL.
///
/// Writes only to the offline-audio cache name, which is distinct from the
/// router's automatic audio cache.
pub struct OfflineAudioCache {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    cache_name: String,
    event_bus: Option<EventBus>,
}

impl OfflineAudioCache {
    pub fn new(storage: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>, names: &CacheNames) -> Self {
        Self {
            storage,
            fetcher,
            cache_name: names.offline_audio.clone(),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Download `url` and store the response.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::InvalidUrl`] for an empty URL
    /// - [`PlaybackError::Bridge`] when the download fails in transport
    /// - [`PlaybackError::DownloadFailed`] for a non-success status
    #[instrument(skip(self, url), fields(url = %core_runtime::logging::strip_url_query(url)))]
    pub async fn cache(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(PlaybackError::InvalidUrl(url.to_string()));
        }

        let request = FetchRequest::get(url).with_destination(RequestDestination::Audio);
        let response = self.fetcher.fetch(&request).await.map_err(|err| {
            warn!(error = %err, "Offline download failed");
            PlaybackError::from(err)
        })?;

        if !response.is_success() {
            warn!(status = response.status, "Offline download returned an error status");
            return Err(PlaybackError::DownloadFailed {
                url: url.to_string(),
                status: response.status,
            });
        }

        let bytes = response.body.len() as u64;
        let cache = self.storage.open(&self.cache_name).await?;
        cache.put(&request, response).await?;

        info!(bytes, "Track saved for offline playback");
        self.emit(CacheEvent::OfflineTrackCached {
            url: url.to_string(),
            bytes,
        });
        Ok(())
    }

    pub async fn is_cached(&self, url: &str) -> Result<bool> {
        if !self.storage.has(&self.cache_name).await? {
            return Ok(false);
        }
        let cache = self.storage.open(&self.cache_name).await?;
        Ok(cache.match_url(url).await?.is_some())
    }

    /// Saved audio body for `url`, for hosts that feed the element from memory.
    pub async fn read(&self, url: &str) -> Result<Option<Bytes>> {
        if !self.storage.has(&self.cache_name).await? {
            return Ok(None);
        }
        let cache = self.storage.open(&self.cache_name).await?;
        Ok(cache.match_url(url).await?.map(|response| response.body))
    }

    /// Remove one saved track. Returns `true` if it was present.
    #[instrument(skip(self, url), fields(url = %core_runtime::logging::strip_url_query(url)))]
    pub async fn remove(&self, url: &str) -> Result<bool> {
        if !self.storage.has(&self.cache_name).await? {
            return Ok(false);
        }
        let cache = self.storage.open(&self.cache_name).await?;
        let removed = cache.delete(&FetchRequest::get(url)).await?;
        if removed {
            debug!("Track removed from offline cache");
            self.emit(CacheEvent::OfflineTrackRemoved {
                url: url.to_string(),
            });
        }
        Ok(removed)
    }

    /// Drop the whole offline cache.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<()> {
        let existed = self.storage.delete(&self.cache_name).await?;
        info!(existed, cache = %self.cache_name, "Offline cache cleared");
        self.emit(CacheEvent::OfflineCacheCleared);
        Ok(())
    }

    /// URLs of every saved track.
    pub async fn cached_urls(&self) -> Result<Vec<String>> {
        if !self.storage.has(&self.cache_name).await? {
            return Ok(Vec::new());
        }
        let cache = self.storage.open(&self.cache_name).await?;
        let mut urls = cache.keys().await?;
        urls.sort();
        Ok(urls)
    }

    pub async fn usage(&self) -> Result<OfflineCacheUsage> {
        if !self.storage.has(&self.cache_name).await? {
            return Ok(OfflineCacheUsage::default());
        }
        let cache = self.storage.open(&self.cache_name).await?;

        let mut usage = OfflineCacheUsage::default();
        for url in cache.keys().await? {
            if let Some(response) = cache.match_url(&url).await? {
                usage.entries += 1;
                usage.total_bytes += response.body.len() as u64;
            }
        }
        Ok(usage)
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Cache(event)).ok();
        }
    }
}
