//! Service-worker scope abstraction.
//!
//! Lifecycle hooks the caching layer needs from its execution environment.

use crate::error::Result;
use crate::platform::PlatformSendSync;

/// Global scope of the worker that intercepts client requests.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait WorkerScope: PlatformSendSync {
    /// Activate the newly installed worker without waiting for old clients to close.
    async fn skip_waiting(&self) -> Result<()>;

    /// Take control of every open client immediately.
    async fn claim_clients(&self) -> Result<()>;
}
