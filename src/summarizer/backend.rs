//! Client for the external text-generation backend.
//!
//! The backend is opaque: one POST endpoint accepting
//! `{ "content": ..., "length": "short"|"medium"|"long" }` and returning
//! `{ "summary": ... }`. Prompt construction, model choice, and retries are
//! its concern, not ours. This client only speaks that shape and reports
//! what went wrong when it couldn't.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::http::{read_limited_text, BodyError};

/// Backend responses larger than this are treated as malformed.
const MAX_RESPONSE_SIZE: usize = 1024 * 1024; // 1MB

/// Caller-chosen summary size category, passed through to the backend as a
/// lowercase wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

impl std::fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        })
    }
}

/// Request body for the backend call.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    pub content: String,
    pub length: SummaryLength,
}

/// Successful backend response; also the shape callers ultimately receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

/// What went wrong talking to the backend. Never surfaced to pipeline
/// callers: the orchestrator logs it and collapses every variant into one
/// generic failure.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    HttpStatus(u16),
    #[error("malformed backend response: {0}")]
    Decode(String),
}

/// HTTP client for the summarization service.
pub struct SummaryBackend {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    api_key: Option<SecretString>,
}

impl SummaryBackend {
    pub fn new(client: reqwest::Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
            api_key: None,
        }
    }

    /// Attach a bearer token sent on every request.
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Dispatch one summarization request. A single attempt; retries, if
    /// any, are the backend's own policy.
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, BackendError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key.expose_secret()));
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| BackendError::Timeout)?
            .map_err(BackendError::Network)?;

        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status().as_u16()));
        }

        let body = read_limited_text(response, MAX_RESPONSE_SIZE)
            .await
            .map_err(|e| match e {
                BodyError::Network(inner) => BackendError::Network(inner),
                oversize => BackendError::Decode(oversize.to_string()),
            })?;

        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for SummaryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryBackend")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> SummaryBackend {
        let endpoint = Url::parse(&format!("{}/v1/summaries", server.uri())).unwrap();
        SummaryBackend::new(reqwest::Client::new(), endpoint, Duration::from_secs(5))
    }

    fn request() -> SummaryRequest {
        SummaryRequest {
            content: "A long article body.".to_string(),
            length: SummaryLength::Short,
        }
    }

    #[test]
    fn test_length_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SummaryLength::Short).unwrap(), "\"short\"");
        assert_eq!(serde_json::to_string(&SummaryLength::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&SummaryLength::Long).unwrap(), "\"long\"");
    }

    #[tokio::test]
    async fn test_summarize_posts_wire_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/summaries"))
            .and(body_partial_json(json!({
                "content": "A long article body.",
                "length": "short",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "Short."})))
            .expect(1)
            .mount(&server)
            .await;

        let result = backend(&server).summarize(&request()).await.unwrap();
        assert_eq!(result.summary, "Short.");
    }

    #[tokio::test]
    async fn test_api_key_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer sk-test-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend(&server).with_api_key(SecretString::from("sk-test-123"));
        backend.summarize(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = backend(&server).summarize(&request()).await.unwrap_err();
        assert!(matches!(err, BackendError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn test_missing_summary_field_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"digest": "wrong key"})))
            .mount(&server)
            .await;

        let err = backend(&server).summarize(&request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&server)
            .await;

        let err = backend(&server).summarize(&request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"summary": "late"}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let endpoint = Url::parse(&format!("{}/v1/summaries", server.uri())).unwrap();
        let fast = SummaryBackend::new(reqwest::Client::new(), endpoint, Duration::from_millis(50));
        let err = fast.summarize(&request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout));
    }

    #[test]
    fn test_debug_masks_api_key() {
        let endpoint = Url::parse("https://backend.example/v1/summaries").unwrap();
        let backend = SummaryBackend::new(reqwest::Client::new(), endpoint, Duration::from_secs(5))
            .with_api_key(SecretString::from("sk-very-secret"));

        let debug = format!("{backend:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
