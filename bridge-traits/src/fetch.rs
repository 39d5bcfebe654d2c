//! Fetch Abstraction
//!
//! Models the subset of the platform fetch API that request interception needs:
//! a request carrying its mode and destination, a response carrying its status
//! and response type, and an async [`Fetcher`] that performs the network round
//! trip.

use bytes::Bytes;
use std::collections::HashMap;

use crate::error::{BridgeError, Result};
use crate::platform::PlatformSendSync;

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

/// How the request was initiated by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestMode {
    /// Top-level document load.
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

/// What the client intends to do with the response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RequestDestination {
    /// Subresource with no declared destination (e.g. `fetch()` from script).
    #[default]
    Empty,
    Document,
    Audio,
    Image,
    Script,
    Style,
    Font,
    Manifest,
    Other(String),
}

/// Outgoing request as observed by the interception layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: String,
    pub mode: RequestMode,
    pub destination: RequestDestination,
    pub headers: HashMap<String, String>,
}

impl FetchRequest {
    /// Plain `GET` subresource request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            mode: RequestMode::default(),
            destination: RequestDestination::default(),
            headers: HashMap::new(),
        }
    }

    /// Document navigation request.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::get(url)
            .with_mode(RequestMode::Navigate)
            .with_destination(RequestDestination::Document)
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_destination(mut self, destination: RequestDestination) -> Self {
        self.destination = destination;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Key under which caches store this request.
    ///
    /// Entries are keyed by URL only; headers and mode do not vary the key.
    pub fn cache_key(&self) -> &str {
        &self.url
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// Classification of a response by origin policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// Same-origin response.
    Basic,
    Cors,
    /// Constructed locally rather than received from the network.
    Default,
    Error,
    Opaque,
    OpaqueRedirect,
}

/// Response returned by a fetch or stored in a cache.
///
/// Cloning is cheap: the body is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub response_type: ResponseType,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl FetchResponse {
    /// Same-origin network response.
    pub fn basic(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: String::new(),
            response_type: ResponseType::Basic,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Locally constructed response, e.g. an offline fallback.
    pub fn synthetic(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            response_type: ResponseType::Default,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get response body as UTF-8 string
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid UTF-8: {}", e)))
    }
}

/// Network fetch trait
///
/// Implementations perform a single network round trip. A response with a
/// non-2xx status is still `Ok`; only transport failures (offline, DNS, TLS,
/// aborted) surface as [`BridgeError::Network`].
///
/// # Example
///
/// ```ignore
/// use bridge_traits::fetch::{Fetcher, FetchRequest};
///
/// async fn load_manifest(fetcher: &dyn Fetcher) -> Result<String> {
///     let response = fetcher.fetch(&FetchRequest::get("/manifest.json")).await?;
///     response.text()
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait Fetcher: PlatformSendSync {
    /// Perform the request against the network.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}
