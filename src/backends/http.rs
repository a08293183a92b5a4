//! HTTP scan API backend.
//!
//! This module drives a batch-style scanning service over HTTP:
//!
//! 1. `POST {base}/requests` submits a named list of domains and yields
//!    a request id.
//! 2. `GET {base}/requests/{id}` reports the request's current stage.
//! 3. `GET {base}/requests/{id}/results` fetches the result document
//!    once the request is done.
//!
//! # Requirements
//!
//! - A batch account (username and password, sent as HTTP basic auth)
//! - Network access to the service's batch endpoint

use crate::core::{ListName, ScanApi, ScanError, ScanReport, ScanStatus, ScanType};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a reported request stage is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Still being processed; poll again later.
    Pending,
    /// Finished; results can be fetched.
    Done,
    /// Terminally failed or cancelled; the scan is gone for our purposes
    /// and a replacement must be submitted.
    Lost,
    /// A stage this client does not know.
    Unknown,
}

/// Maps the service's stage string onto this client's handling of it.
fn classify_stage(stage: &str) -> Stage {
    match stage {
        "registering" | "running" | "generating" => Stage::Pending,
        "done" => Stage::Done,
        "error" | "cancelled" => Stage::Lost,
        _ => Stage::Unknown,
    }
}

/// Cuts a body down to at most `max` bytes on a char boundary, so error
/// pages with multi-byte text never split a character.
fn bounded_prefix(mut body: String, max: usize) -> String {
    if body.len() > max {
        let cut = (0..=max)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    body
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    #[serde(rename = "type")]
    scan_type: &'a str,
    domains: &'a [String],
    name: &'a str,
}

#[derive(Deserialize)]
struct RequestEnvelope {
    request: RequestInfo,
}

#[derive(Deserialize)]
struct RequestInfo {
    #[serde(default)]
    request_id: String,
    #[serde(default)]
    status: String,
}

/// HTTP scan API configuration.
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    /// Base URL of the batch endpoint, without a trailing slash.
    pub base_url: String,

    /// Batch account username.
    pub username: String,

    /// Batch account password (kept secret).
    pub password: SecretString,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpApiConfig {
    /// Creates a new configuration for the given endpoint and account.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: SecretString::new(password.into().into()),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP scan API implementation.
///
/// # Example
///
/// ```rust,ignore
/// use scanledger::backends::{HttpApiConfig, HttpScanApi};
///
/// let config = HttpApiConfig::new(
///     "https://batch.example.nl/api/batch/v2",
///     "account",
///     "secret",
/// );
/// let api = HttpScanApi::new(config);
/// ```
#[derive(Debug)]
pub struct HttpScanApi {
    config: HttpApiConfig,
    client: reqwest::Client,
}

impl HttpScanApi {
    /// Creates a new API client with the given configuration.
    pub fn new(config: HttpApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .basic_auth(
                &self.config.username,
                Some(self.config.password.expose_secret()),
            )
            .timeout(self.config.timeout)
    }

    /// Turns a non-success response into an `Api` error, keeping a
    /// bounded prefix of the body for diagnosis.
    async fn api_error(response: reqwest::Response) -> ScanError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("no response body").to_string()
        } else {
            bounded_prefix(body, 200)
        };
        ScanError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn parse_envelope(response: reqwest::Response) -> Result<RequestInfo, ScanError> {
        let envelope: RequestEnvelope = response
            .json()
            .await
            .map_err(|e| ScanError::invalid_response(e.to_string()))?;
        Ok(envelope.request)
    }

    /// Fetches the result document of a finished request.
    async fn fetch_results(&self, scan_id: &str) -> Result<ScanStatus, ScanError> {
        let url = self.endpoint(&format!("requests/{scan_id}/results"));

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ScanError::transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(ScanStatus::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ScanError::invalid_response(e.to_string()))?;
        if !payload.is_object() {
            return Err(ScanError::invalid_response(
                "results body is not a JSON object",
            ));
        }

        Ok(ScanStatus::Completed(ScanReport::new(payload)))
    }
}

#[async_trait]
impl ScanApi for HttpScanApi {
    fn name(&self) -> &str {
        "batch-api"
    }

    async fn submit(
        &self,
        list: &ListName,
        domains: &[String],
        scan_type: ScanType,
    ) -> Result<String, ScanError> {
        let url = self.endpoint("requests");
        let body = SubmitBody {
            scan_type: scan_type.as_str(),
            domains,
            name: list.as_str(),
        };

        let response = self
            .request(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ScanError::transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let info = Self::parse_envelope(response).await?;
        if info.request_id.is_empty() {
            return Err(ScanError::invalid_response(
                "submission response carried no request id",
            ));
        }

        tracing::debug!(
            list = %list,
            scan_type = %scan_type,
            scan_id = %info.request_id,
            domains = domains.len(),
            "Batch scan submitted"
        );

        Ok(info.request_id)
    }

    async fn poll(&self, scan_id: &str) -> Result<ScanStatus, ScanError> {
        let url = self.endpoint(&format!("requests/{scan_id}"));

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ScanError::transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(ScanStatus::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let info = Self::parse_envelope(response).await?;
        tracing::debug!(scan_id = %scan_id, stage = %info.status, "Polled batch scan");

        match classify_stage(&info.status) {
            Stage::Pending => Ok(ScanStatus::InProgress),
            Stage::Done => self.fetch_results(scan_id).await,
            Stage::Lost => {
                tracing::warn!(
                    scan_id = %scan_id,
                    stage = %info.status,
                    "Service reported the scan as terminally failed"
                );
                Ok(ScanStatus::NotFound)
            }
            Stage::Unknown => Err(ScanError::invalid_response(format!(
                "unrecognized request status '{}'",
                info.status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpApiConfig::new("https://batch.example.nl/api/v2/", "user", "pass")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.base_url, "https://batch.example.nl/api/v2");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_classify_stage() {
        assert_eq!(classify_stage("registering"), Stage::Pending);
        assert_eq!(classify_stage("running"), Stage::Pending);
        assert_eq!(classify_stage("generating"), Stage::Pending);
        assert_eq!(classify_stage("done"), Stage::Done);
        assert_eq!(classify_stage("error"), Stage::Lost);
        assert_eq!(classify_stage("cancelled"), Stage::Lost);
        assert_eq!(classify_stage("frobnicating"), Stage::Unknown);
    }

    #[test]
    fn test_bounded_prefix_respects_char_boundaries() {
        // A multi-byte character straddling the cut must not panic
        let body = format!("{}é and more", "x".repeat(199));
        let bounded = bounded_prefix(body, 200);
        assert_eq!(bounded.len(), 199);
        assert!(bounded.chars().all(|c| c == 'x'));

        let short = bounded_prefix("tiny".to_string(), 200);
        assert_eq!(short, "tiny");

        let exact = bounded_prefix("a".repeat(200), 200);
        assert_eq!(exact.len(), 200);
    }

    #[test]
    fn test_envelope_parsing() {
        let body = serde_json::json!({
            "request": {"request_id": "req-77", "status": "running", "name": "BANKS"}
        });
        let envelope: RequestEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.request.request_id, "req-77");
        assert_eq!(envelope.request.status, "running");
    }

    #[test]
    fn test_submit_body_wire_shape() {
        let domains = vec!["a.example.nl".to_string()];
        let body = SubmitBody {
            scan_type: ScanType::Mail.as_str(),
            domains: &domains,
            name: "BANKS",
        };
        let text = serde_json::to_string(&body).unwrap();
        assert_eq!(
            text,
            r#"{"type":"mail","domains":["a.example.nl"],"name":"BANKS"}"#
        );
    }
}
