//! reqwest-based [`Transport`]
//!
//! Sends the already-signed request and hands back status + body. Any HTTP
//! status is returned as-is: the gateway answers 4xx/5xx with a JSON error
//! envelope that the decoder must see.
//!
//! # Retry strategy
//! - Only `Network` and `Timeout` errors are retried
//! - Exponential backoff: 100ms, 200ms, 400ms, 800ms, ... (maximum 10 seconds)
//! - Disabled by default (`max_retries = 0`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use crate::config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::{Result, TopError};
use crate::traits::Transport;
use crate::types::{HttpMethod, TransportRequest, TransportResponse};
use crate::utils::log_sanitizer::truncate_for_log;

/// Default HTTP transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_retries: u32,
}

impl ReqwestTransport {
    /// Creates a transport with default timeouts and no retries.
    pub fn new() -> Result<Self> {
        Self::with_timeouts(
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            0,
        )
    }

    /// Creates a transport from the client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_timeouts(
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.request_timeout_secs),
            config.max_retries,
        )
    }

    fn with_timeouts(connect: Duration, request: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect)
            .timeout(request)
            .build()
            .map_err(|e| TopError::Configuration {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self::with_client(client, max_retries))
    }

    /// Wraps an existing reqwest client (shared pools, proxies, custom TLS).
    pub fn with_client(client: Client, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
        }
    }

    fn request_builder(&self, request: TransportRequest) -> RequestBuilder {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }
        builder
    }

    /// Performs one HTTP exchange.
    async fn execute_request(
        request_builder: RequestBuilder,
        label: &str,
    ) -> Result<TransportResponse> {
        log::debug!("[top] {label}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TopError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                TopError::Network {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[top] Response Status: {status}");

        let body = response.bytes().await.map_err(|e| TopError::Network {
            detail: format!("Failed to read response body: {e}"),
        })?;

        log::debug!(
            "[top] Response Body: {}",
            truncate_for_log(&String::from_utf8_lossy(&body))
        );

        Ok(TransportResponse::new(status, body.to_vec()))
    }

    /// Performs the exchange, retrying transient failures.
    async fn execute_request_with_retry(
        &self,
        request_builder: RequestBuilder,
        label: &str,
    ) -> Result<TransportResponse> {
        if self.max_retries == 0 {
            return Self::execute_request(request_builder, label).await;
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            // RequestBuilder can only be used once
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[top] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, label).await;
            };

            match Self::execute_request(req, label).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "[top] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        attempt + 1,
                        self.max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| TopError::Network {
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let label = format!(
            "{} {} ({})",
            request.method.as_str(),
            request.url.split('?').next().unwrap_or_default(),
            request.params.get("method").unwrap_or("?")
        );
        let builder = self.request_builder(request);
        self.execute_request_with_retry(builder, &label).await
    }
}

/// Calculate exponential backoff delay
///
/// Backoff strategy: 100ms, 200ms, 400ms, 800ms, 1.6s, ...
/// Maximum delay limit is 10 seconds
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    let delay_ms = delay_ms.min(10_000);
    Duration::from_millis(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalParameterSet, FORM_CONTENT_TYPE};

    // ---- backoff_delay ----

    #[test]
    fn backoff_attempt_0() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
    }

    #[test]
    fn backoff_attempt_3() {
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_capped_at_10s() {
        // attempt 7: 100 * 2^7 = 12800ms, capped to 10000ms
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(10_000));
    }

    // ---- request_builder ----

    #[test]
    fn builds_form_post() {
        let transport = ReqwestTransport::with_client(Client::new(), 0);
        let request = TransportRequest {
            method: HttpMethod::Post,
            url: "https://api.taobao.com/router/rest".to_string(),
            headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: b"app_key=1&method=taobao.httpdns.get".to_vec(),
            params: CanonicalParameterSet::new(),
        };

        let built = transport.request_builder(request).build().unwrap();
        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(built.url().as_str(), "https://api.taobao.com/router/rest");
        assert_eq!(
            built
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some(FORM_CONTENT_TYPE)
        );
        assert_eq!(
            built.body().and_then(reqwest::Body::as_bytes),
            Some(&b"app_key=1&method=taobao.httpdns.get"[..])
        );
    }

    #[test]
    fn builds_get_without_body() {
        let transport = ReqwestTransport::with_client(Client::new(), 0);
        let request = TransportRequest {
            method: HttpMethod::Get,
            url: "https://api.taobao.com/router/rest?app_key=1".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            params: CanonicalParameterSet::new(),
        };

        let built = transport.request_builder(request).build().unwrap();
        assert_eq!(built.method(), reqwest::Method::GET);
        assert_eq!(built.url().query(), Some("app_key=1"));
        assert!(built.body().is_none());
    }
}
