//! The boundary between the token/request core and the network.
//!
//! The core describes a request as an [`OutboundRequest`] and hands it to a
//! [`Transport`], which answers with the raw body or a [`TransportError`].
//! Interpreting the body is left to the core.

mod error;
mod http;
pub mod mock;

use std::future::Future;

pub use error::TransportError;
pub use http::{HttpTransport, HttpTransportConfig};

/// Upstream endpoints the core talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `HandleEventWithNode`: presses the "Confirm hire" button.
    HandleEventWithNode,
    /// `GenerateLCHSDynamicSearch`: free-text station search.
    StationSearch,
}

impl Endpoint {
    /// Path relative to the upstream base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::HandleEventWithNode => "/Workflows/HandleEventWithNode",
            Endpoint::StationSearch => "/Clients/TfL/GenerateLCHSDynamicSearch",
        }
    }

    /// Query parameters the endpoint expects.
    pub fn query(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Endpoint::HandleEventWithNode => &[("format", "json")],
            Endpoint::StationSearch => &[],
        }
    }
}

/// A fully formed form POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub endpoint: Endpoint,
    pub headers: Vec<(&'static str, String)>,
    pub form: Vec<(&'static str, String)>,
}

impl OutboundRequest {
    /// Create an empty request for an endpoint.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.form.push((name, value.into()));
        self
    }

    /// First value of a header, by exact name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value of a form field, by exact name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody(String);

impl ResponseBody {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sends requests built by the core.
///
/// Implementations report non-success HTTP statuses as errors; a returned
/// body is always from a response the upstream considered successful.
pub trait Transport {
    fn send(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<ResponseBody, TransportError>> + Send;
}
