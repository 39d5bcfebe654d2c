//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for native hosts
//! (macOS, Windows, Linux) and for tests.
//!
//! ## Overview
//!
//! - [`ReqwestFetcher`]: `Fetcher` using `reqwest`
//! - [`MemoryCacheStorage`]: in-process `CacheStorage`
//! - [`DesktopWorkerScope`]: `WorkerScope` for hosts with no worker lifecycle
//!
//! Native hosts have no audio element or OS media session of their own; those
//! bridges come from the embedding application.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{MemoryCacheStorage, ReqwestFetcher};
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let fetcher = ReqwestFetcher::new()?.with_base_url("https://app.example")?;
//!     let caches = MemoryCacheStorage::new();
//!
//!     // Hand both to core-service
//!     Ok(())
//! }
//! ```

mod cache;
mod fetch;
mod worker;

pub use cache::{MemoryCache, MemoryCacheStorage};
pub use fetch::ReqwestFetcher;
pub use worker::DesktopWorkerScope;
