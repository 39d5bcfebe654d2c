//! # Core Router
//!
//! Request-interception cache layer for the service-worker context.
//!
//! [`CacheRouter`] classifies every intercepted request (audio, navigation or
//! static) and serves it through the matching strategy. It also owns the
//! cache-generation lifecycle: [`CacheRouter::install`] precaches the app
//! shell, [`CacheRouter::activate`] drops stale generations and claims
//! clients.
//!
//! The router never touches the platform directly; the network, cache storage
//! and worker scope are injected through `bridge-traits`.
//!
//! ```ignore
//! let router = CacheRouter::new(&config, fetcher, storage, worker)
//!     .with_event_bus(bus.clone());
//! router.install().await?;
//! router.activate().await?;
//!
//! let outcome = router.handle_fetch(&request).await?;
//! respond_with(outcome.response);
//! ```

pub mod classify;
pub mod error;
mod lifecycle;
pub mod router;

pub use classify::{RequestClassifier, RequestKind};
pub use error::{Result, RouterError};
pub use router::{CacheRouter, FetchOutcome};
