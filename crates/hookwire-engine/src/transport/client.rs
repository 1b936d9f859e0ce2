//! Reqwest-based transport implementation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method};

use hookwire_core::{Error, Result, ServiceHealth};

use super::{HttpConfig, HttpRequest, TRACING_TARGET, Transport};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestTransportInner {
    http: Client,
    config: HttpConfig,
}

/// Reqwest-backed [`Transport`].
///
/// Sends one HTTP/1.1 request and reconstructs the complete raw response
/// text (status line, headers, blank line, body) so the engine can classify
/// and record it verbatim. Connection lifecycle is owned by reqwest; the
/// connection is released on every exit path.
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Arc<ReqwestTransportInner>,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a new transport with the given configuration.
    pub fn new(config: HttpConfig) -> Self {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest transport"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .expect("failed to create HTTP client");

        Self {
            inner: Arc::new(ReqwestTransportInner { http, config }),
        }
    }

    /// Gets the transport configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.inner.config
    }

    fn map_send_error(error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::timeout().with_message(error.to_string()).with_source(error)
        } else if error.is_connect() {
            Error::network_error()
                .with_message("Connection failed")
                .with_source(error)
        } else {
            Error::network_error().with_message(error.to_string()).with_source(error)
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(HttpConfig::default())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<String> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            Error::invalid_input()
                .with_message(format!("invalid HTTP method {:?}", request.method))
                .with_source(e)
        })?;

        let mut http_request = self.inner.http.request(method, &request.url);
        for line in &request.headers {
            if let Some((name, value)) = line.split_once(':') {
                http_request = http_request.header(name.trim(), value.trim());
            }
        }
        if !request.body.is_empty() {
            http_request = http_request.body(request.body.clone());
        }

        let response = http_request.send().await.map_err(Self::map_send_error)?;

        let status = response.status();
        let mut raw = format!(
            "HTTP/1.1 {} {}\r\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        for (name, value) in response.headers() {
            raw.push_str(name.as_str());
            raw.push_str(": ");
            raw.push_str(value.to_str().unwrap_or(""));
            raw.push_str("\r\n");
        }
        raw.push_str("\r\n");

        let body = response.text().await.map_err(Self::map_send_error)?;
        raw.push_str(&body);

        Ok(raw)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        // The client is stateless and always healthy if it was created.
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_core::ServiceStatus;

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::default();
        assert!(transport.config().user_agent.is_none());
    }

    #[tokio::test]
    async fn test_invalid_method_is_rejected() {
        let transport = ReqwestTransport::default();
        let request = HttpRequest {
            method: "NOT A VERB".to_string(),
            url: "https://example.com".to_string(),
            headers: Vec::new(),
            body: String::new(),
        };

        let error = transport.send(&request).await.unwrap_err();
        assert_eq!(error.kind(), hookwire_core::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_health_check() {
        let transport = ReqwestTransport::default();
        let health = transport.health_check().await.unwrap();
        assert_eq!(health.status, ServiceStatus::Healthy);
    }
}
