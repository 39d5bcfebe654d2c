//! Worker lifecycle for hosts without a service-worker runtime.

use async_trait::async_trait;
use bridge_traits::{error::Result, worker::WorkerScope};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// `WorkerScope` that only records activation requests.
///
/// Native hosts run the router in-process, so there is no waiting phase to
/// skip and no clients to claim.
#[derive(Debug, Default)]
pub struct DesktopWorkerScope {
    skip_waiting_calls: AtomicUsize,
    claim_calls: AtomicUsize,
}

impl DesktopWorkerScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting_calls.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> usize {
        self.claim_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkerScope for DesktopWorkerScope {
    async fn skip_waiting(&self) -> Result<()> {
        self.skip_waiting_calls.fetch_add(1, Ordering::SeqCst);
        debug!("skip_waiting requested");
        Ok(())
    }

    async fn claim_clients(&self) -> Result<()> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        debug!("claim_clients requested");
        Ok(())
    }
}
