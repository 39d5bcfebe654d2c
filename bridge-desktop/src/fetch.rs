//! Fetcher Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    fetch::{FetchRequest, FetchResponse, Fetcher, HttpMethod, ResponseType},
};
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Reqwest-based fetcher.
///
/// Relative request URLs (such as the precached `/` or `/manifest.json`) are
/// resolved against the configured base URL. Responses from the base URL's
/// origin are typed [`ResponseType::Basic`], everything else
/// [`ResponseType::Cors`].
///
/// Requests are attempted once; transport failures map to
/// [`BridgeError::Network`] and any HTTP status is returned as a response.
pub struct ReqwestFetcher {
    client: Client,
    base_url: Option<Url>,
}

impl ReqwestFetcher {
    /// Create a fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("cadence/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self::with_client(client))
    }

    /// Create a fetcher around a preconfigured client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Resolve relative URLs against `base` and treat its origin as same-origin.
    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        let url = Url::parse(base)
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid base URL {}: {}", base, e)))?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }

    fn resolve(&self, raw: &str) -> Result<Url> {
        let parsed = match &self.base_url {
            Some(base) => base.join(raw),
            None => Url::parse(raw),
        };
        parsed.map_err(|e| BridgeError::OperationFailed(format!("Invalid request URL {}: {}", raw, e)))
    }

    fn response_type(&self, url: &Url) -> ResponseType {
        match &self.base_url {
            Some(base) if base.origin() != url.origin() => ResponseType::Cors,
            _ => ResponseType::Basic,
        }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let url = self.resolve(&request.url)?;
        let response_type = self.response_type(&url);

        let mut builder = self
            .client
            .request(Self::convert_method(request.method), url.clone());
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        debug!(method = ?request.method, path = url.path(), "Fetching");

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, path = url.path(), "Fetch failed");
            if e.is_timeout() {
                BridgeError::Network("Request timed out".to_string())
            } else if e.is_connect() {
                BridgeError::Network(format!("Connection failed: {}", e))
            } else {
                BridgeError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            response_type,
            headers,
            body,
        })
    }
}
