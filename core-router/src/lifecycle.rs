//! Cache-generation lifecycle: install, activate, cleanup.

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use bridge_traits::FetchRequest;
use core_runtime::events::CacheEvent;

use crate::error::{RouterError, Result};
use crate::router::CacheRouter;

impl CacheRouter {
    /// Precache the app shell into the current shell cache, then skip waiting.
    ///
    /// All precache URLs are fetched before anything is written, so a failed
    /// install leaves the new generation empty. Returns the number of
    /// resources stored.
    #[instrument(skip(self), fields(cache = %self.names.app_shell))]
    pub async fn install(&self) -> Result<usize> {
        let requests: Vec<FetchRequest> = self
            .precache_urls
            .iter()
            .map(|url| FetchRequest::get(url.as_str()))
            .collect();

        let responses = join_all(requests.iter().map(|request| self.fetcher.fetch(request))).await;

        let mut fetched = Vec::with_capacity(requests.len());
        for (request, result) in requests.iter().zip(responses) {
            let response = result.map_err(|err| RouterError::Precache {
                url: request.url.clone(),
                reason: err.to_string(),
            })?;
            if !response.is_success() {
                return Err(RouterError::Precache {
                    url: request.url.clone(),
                    reason: format!("HTTP {}", response.status),
                });
            }
            fetched.push((request, response));
        }

        let cache = self.storage.open(&self.names.app_shell).await?;
        let precached = fetched.len();
        for (request, response) in fetched {
            cache.put(request, response).await?;
        }
        debug!(precached, "App shell precached");

        self.worker
            .skip_waiting()
            .await
            .map_err(|err| RouterError::Worker(err.to_string()))?;

        info!(precached, "Service worker installed");
        self.emit(CacheEvent::Installed {
            cache_name: self.names.app_shell.clone(),
            precached,
        });
        Ok(precached)
    }

    /// Remove stale generations and take control of open clients.
    /// Returns the purged cache names.
    #[instrument(skip(self))]
    pub async fn activate(&self) -> Result<Vec<String>> {
        let purged = self.purge_stale().await?;

        self.worker
            .claim_clients()
            .await
            .map_err(|err| RouterError::Worker(err.to_string()))?;

        info!(purged = purged.len(), "Service worker activated");
        self.emit(CacheEvent::Activated {
            purged: purged.clone(),
        });
        Ok(purged)
    }

    /// Delete every cache not named by the current generation.
    ///
    /// The offline-audio cache is always kept, whatever its name.
    pub async fn purge_stale(&self) -> Result<Vec<String>> {
        let mut purged = Vec::new();
        for name in self.storage.keys().await? {
            if self.names.is_retained(&name) {
                continue;
            }
            if self.storage.delete(&name).await? {
                debug!(cache = %name, "Deleted stale cache");
                purged.push(name);
            } else {
                warn!(cache = %name, "Stale cache vanished before deletion");
            }
        }
        Ok(purged)
    }
}
