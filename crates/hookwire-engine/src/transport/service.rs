//! Transport service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use hookwire_core::{Result, ServiceHealth};

use super::{CONNECT_FAILURE_MESSAGE, DispatchOutcome, HttpRequest, TRACING_TARGET, Transport, classify};
use crate::hook::HeaderSpec;

/// Transport wrapper that builds, sends, and classifies hook requests.
///
/// This wrapper adds structured logging to any [`Transport`] implementation.
/// The inner transport is wrapped in `Arc` for cheap cloning. Every failure
/// mode (malformed headers, transport exceptions, non-2xx answers) is
/// absorbed into the returned [`DispatchOutcome`]; `send` never errors.
#[derive(Clone)]
pub struct TransportService {
    inner: Arc<dyn Transport>,
}

impl fmt::Debug for TransportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportService").finish_non_exhaustive()
    }
}

impl TransportService {
    /// Creates a new transport service wrapper.
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            inner: Arc::new(transport),
        }
    }

    /// Builds and sends one hook request, classifying the response.
    ///
    /// `method` defaults to `GET` when empty. Custom headers are normalized
    /// from either shape of [`HeaderSpec`]; the `Authorization` and
    /// `Content-Type` lines are appended when present.
    pub async fn send(
        &self,
        headers: &HeaderSpec,
        auth_header: Option<&str>,
        content_type: Option<&str>,
        url: &str,
        body: &str,
        method: &str,
    ) -> DispatchOutcome {
        let method = if method.is_empty() { "GET" } else { method };

        let mut header_lines = match headers.normalize() {
            Ok(lines) => lines,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    %error,
                    "Malformed custom header list"
                );
                return DispatchOutcome::failure(String::new(), error.to_string());
            }
        };
        if let Some(auth) = auth_header.filter(|a| !a.is_empty()) {
            header_lines.push(format!("Authorization: {auth}"));
        }
        if let Some(content_type) = content_type.filter(|c| !c.is_empty()) {
            header_lines.push(format!("Content-Type: {content_type}"));
        }

        let request = HttpRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: header_lines,
            body: body.to_string(),
        };

        let started_at = Instant::now();
        tracing::debug!(
            target: TRACING_TARGET,
            method,
            url,
            "Sending hook request"
        );

        let outcome = match self.inner.send(&request).await {
            Ok(raw) => classify(raw),
            Err(error) => {
                // Transport-level exceptions become a classified failure,
                // never a propagated error.
                DispatchOutcome::failure(String::new(), error.to_string())
            }
        };
        let elapsed = started_at.elapsed();

        if outcome.success {
            tracing::debug!(
                target: TRACING_TARGET,
                url,
                elapsed_ms = elapsed.as_millis(),
                "Hook request delivered"
            );
        } else {
            tracing::warn!(
                target: TRACING_TARGET,
                url,
                message = outcome.message.as_deref().unwrap_or(CONNECT_FAILURE_MESSAGE),
                elapsed_ms = elapsed.as_millis(),
                "Hook request failed"
            );
        }

        outcome
    }

    /// Performs a health check on the underlying transport, recording the
    /// observed response time.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        let started_at = Instant::now();
        let health = self.inner.health_check().await?;
        Ok(health.with_response_time(started_at.elapsed()))
    }
}
