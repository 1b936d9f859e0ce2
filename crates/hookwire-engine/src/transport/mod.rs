//! Outbound HTTP transport and response classification.
//!
//! The engine speaks to the network through the [`Transport`] trait: one
//! HTTP/1.1 request in, the complete raw response text out (status line,
//! headers, blank line, body). Classification of that raw text into a
//! [`DispatchOutcome`] happens engine-side so it is testable without a
//! socket. The reqwest-backed implementation lives in
//! [`ReqwestTransport`].

mod client;
mod config;
mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use hookwire_core::{Result, ServiceHealth};

pub use client::ReqwestTransport;
pub use config::HttpConfig;
pub use service::TransportService;

/// Tracing target for transport operations.
pub const TRACING_TARGET: &str = "hookwire_engine::transport";

/// Generic message for unreachable endpoints and non-2xx answers.
pub const CONNECT_FAILURE_MESSAGE: &str = "Cannot connect to server. Please try again later.";

/// One fully materialized outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Normalized `"name: value"` header lines, in order.
    pub headers: Vec<String>,
    /// Request body; may be empty.
    pub body: String,
}

/// Low-level HTTP transport.
///
/// Implementations write one request and read the full raw response; they
/// own connection lifecycle and release it on every exit path.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the complete raw response text.
    async fn send(&self, request: &HttpRequest) -> Result<String>;

    /// Performs a health check on the transport.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &HttpRequest) -> Result<String> {
        self.as_ref().send(request).await
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        self.as_ref().health_check().await
    }
}

/// Result of one delivery attempt, consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Whether the endpoint answered with a 2xx status.
    pub success: bool,
    /// Complete raw response text; empty on pre-send failure.
    pub response: String,
    /// Failure reason, absent on success.
    pub message: Option<String>,
}

impl DispatchOutcome {
    /// A successful delivery carrying the raw response.
    pub fn success(response: String) -> Self {
        Self {
            success: true,
            response,
            message: None,
        }
    }

    /// A failed delivery with whatever response text was captured.
    pub fn failure(response: String, message: impl Into<String>) -> Self {
        Self {
            success: false,
            response,
            message: Some(message.into()),
        }
    }
}

/// Whether an HTTP status code counts as a successful delivery.
pub fn is_success(code: u16) -> bool {
    (200..300).contains(&code)
}

/// Classifies a raw HTTP response into a [`DispatchOutcome`].
///
/// The head is isolated at the first blank-line boundary and the numeric
/// code extracted from the status line. An empty response, an unparsable
/// status line, and a non-2xx code all classify as failure with the generic
/// connectivity message.
pub fn classify(raw: String) -> DispatchOutcome {
    match status_code(&raw) {
        Some(code) if is_success(code) => DispatchOutcome::success(raw),
        _ => DispatchOutcome::failure(raw, CONNECT_FAILURE_MESSAGE),
    }
}

/// Extracts the status code from the raw response's status line.
fn status_code(raw: &str) -> Option<u16> {
    let head = raw.split("\r\n\r\n").next()?;
    let status_line = head.lines().next()?;
    if !status_line.starts_with("HTTP/") {
        return None;
    }
    status_line.split_whitespace().nth(1)?.parse().ok()
}
