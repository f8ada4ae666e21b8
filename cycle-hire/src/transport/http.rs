//! reqwest-backed transport for the upstream API.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use super::error::TransportError;
use super::{OutboundRequest, ResponseBody, Transport};

/// Default base URL of the upstream platform.
const DEFAULT_BASE_URL: &str = "https://ce-a22.corethree.net";

/// User agent of the iOS app the example tokens were captured from.
const DEFAULT_USER_AGENT: &str =
    "Core/202503171232 (iOS; iPad14,1; iPadOS 18.3.2; uk.gov.tfl.cyclehire)";

/// Longest error body kept in a [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 500;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// `User-Agent` sent on every request
    pub user_agent: String,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl HttpTransportConfig {
    /// Create a config with production defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Disable certificate checks, as the upstream app's own tooling did.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends [`OutboundRequest`]s as form POSTs.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn header_map(request: &OutboundRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let invalid = || TransportError::InvalidHeader {
                name: name.to_string(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ResponseBody, TransportError> {
        let url = format!("{}{}", self.base_url, request.endpoint.path());
        let headers = Self::header_map(request)?;

        let mut builder = self.http.post(&url).headers(headers).form(&request.form);
        let query = request.endpoint.query();
        if !query.is_empty() {
            builder = builder.query(query);
        }

        debug!(endpoint = ?request.endpoint, "sending request");
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint = ?request.endpoint, status = status.as_u16(), "upstream error status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response.text().await?;
        Ok(ResponseBody::new(body))
    }
}
