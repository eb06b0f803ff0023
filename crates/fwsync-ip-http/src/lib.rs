// # HTTP IP Resolver
//
// This crate provides an HTTP-based public IP resolver for the fwsync
// system.
//
// ## Architecture
//
// Fetches the caller's public IP and geolocation metadata from an external
// service that speaks the ifconfig.co JSON format, one GET per call. The
// resolver is stateless and single-shot: no polling, no caching, no retry
// (retry policy belongs to the caller).

use std::time::Duration;

use async_trait::async_trait;
use fwsync_core::traits::IpResolver;
use fwsync_core::types::IpConfig;
use fwsync_core::{Error, Result};

/// Default geolocation endpoint
const DEFAULT_ENDPOINT: &str = "https://ifconfig.co/json";

/// HTTP timeout for lookup requests
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP resolver
///
/// # Example
///
/// ```rust,no_run
/// use fwsync_ip_http::HttpIpResolver;
/// use fwsync_core::traits::IpResolver;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = HttpIpResolver::default();
///     let ip_config = resolver.resolve().await?;
///     println!("public ip: {}", ip_config.ip);
///     Ok(())
/// }
/// ```
pub struct HttpIpResolver {
    /// Endpoint serving the ifconfig.co JSON document
    url: String,

    /// HTTP client for lookups
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against a specific endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// The endpoint this resolver queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decode a response body into an [`IpConfig`]
    ///
    /// Split out from the request path so malformed-body handling is
    /// testable without a live endpoint.
    fn decode_body(body: &str) -> Result<IpConfig> {
        serde_json::from_str(body)
            .map_err(|e| Error::ip_lookup(format!("Malformed provider response: {}", e)))
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<IpConfig> {
        tracing::debug!("Resolving public IP via {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_lookup(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_lookup(format!(
                "HTTP error from {}: {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_lookup(format!("Failed to read response: {}", e)))?;

        let ip_config = Self::decode_body(&body)?;
        if ip_config.ip.is_empty() {
            return Err(Error::ip_lookup(format!(
                "Provider response from {} carries no IP",
                self.url
            )));
        }

        Ok(ip_config)
    }
}
