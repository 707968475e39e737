use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{error::EstimateError, protocol::EstimateRequest};
use url::Url;
use uuid::Uuid;

/// Deadline for one webhook round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam to the external estimation webhook.
///
/// Implementations post the payload and hand back the decoded reply without
/// shape-checking it; normalization happens in the caller.
#[async_trait]
pub trait EstimateBackend: Send + Sync {
    async fn fetch_estimate(&self, request: &EstimateRequest) -> Result<Value, EstimateError>;
}

/// Null backend used when no webhook endpoint has been wired in.
pub struct MissingEstimateBackend;

#[async_trait]
impl EstimateBackend for MissingEstimateBackend {
    async fn fetch_estimate(&self, _request: &EstimateRequest) -> Result<Value, EstimateError> {
        Err(EstimateError::network("estimate backend is unavailable"))
    }
}

/// Production backend: one JSON POST per submission, with a per-request
/// deadline and a correlation id for log matching on the webhook side.
pub struct WebhookBackend {
    http: Client,
    endpoint: Url,
}

impl WebhookBackend {
    pub fn new(endpoint: Url) -> anyhow::Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build webhook http client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EstimateBackend for WebhookBackend {
    async fn fetch_estimate(&self, request: &EstimateRequest) -> Result<Value, EstimateError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, endpoint = %self.endpoint, "posting estimate request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-request-id", request_id.to_string())
            .json(request)
            .send()
            .await
            .map_err(|err| {
                let reason = if err.is_timeout() {
                    format!("webhook request timed out: {err}")
                } else if err.is_connect() {
                    format!("webhook is unreachable: {err}")
                } else {
                    err.to_string()
                };
                EstimateError::Network {
                    status: err.status().map(|s| s.as_u16()),
                    reason,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%request_id, status = status.as_u16(), "webhook returned non-success status");
            return Err(EstimateError::http_status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| EstimateError::malformed(format!("response body was not valid json: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorKind;

    fn any_request() -> EstimateRequest {
        EstimateRequest {
            calls_per_day: 1,
            avg_call_duration: 1,
            estimated_users: 1,
            llm_provider: "OpenAI".into(),
            stt_provider: "Deepgram".into(),
            tts_provider: "ElevenLabs".into(),
            knowledge_base_size: "Small (<1MB)".into(),
            self_hosted: false,
            gpu_instance_type: String::new(),
        }
    }

    #[tokio::test]
    async fn missing_backend_reports_network_error() {
        let err = MissingEstimateBackend
            .fetch_estimate(&any_request())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_network_error() {
        // Port 9 (discard) on localhost is not listening in the test env.
        let endpoint = Url::parse("http://127.0.0.1:9/estimate").expect("url");
        let backend =
            WebhookBackend::with_timeout(endpoint, Duration::from_millis(500)).expect("backend");
        let err = backend
            .fetch_estimate(&any_request())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
