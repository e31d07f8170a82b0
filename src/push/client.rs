//! Outbound HTTP push client.
//!
//! # Responsibilities
//! - POST serialized payloads to the log and metric endpoints
//! - Attach the bearer credentials each backend expects
//! - Map non-2xx responses and transport failures to `PushError`

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::config::TelemetryConfig;
use crate::push::types::{PushError, PushJob, PushResult, PushTarget};

/// A resolved push destination.
#[derive(Debug, Clone)]
struct Endpoint {
    url: String,
    authorization: String,
}

impl Endpoint {
    fn new(url: &str, token: String) -> Option<Self> {
        if url.is_empty() {
            return None;
        }
        Some(Self {
            url: url.to_string(),
            authorization: format!("Bearer {}", token),
        })
    }
}

/// HTTP client shared by all push jobs.
#[derive(Debug, Clone)]
pub struct PushClient {
    http: reqwest::Client,
    logs: Option<Endpoint>,
    metrics: Option<Endpoint>,
    quiet_log_rejections: bool,
}

impl PushClient {
    /// Build a client from configuration.
    pub fn new(config: &TelemetryConfig) -> PushResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.dispatch.request_timeout_secs))
            .build()?;

        let logs = Endpoint::new(
            &config.logging.url,
            format!("{}:{}", config.logging.user_id, config.logging.api_key),
        );
        let metrics = Endpoint::new(&config.metrics.url, config.metrics.api_key.clone());

        Ok(Self {
            http,
            logs,
            metrics,
            quiet_log_rejections: config.test_mode,
        })
    }

    /// Whether a rejected log push should stay out of the diagnostic output.
    pub fn quiet_log_rejections(&self) -> bool {
        self.quiet_log_rejections
    }

    fn endpoint(&self, target: PushTarget) -> Option<&Endpoint> {
        match target {
            PushTarget::Logs => self.logs.as_ref(),
            PushTarget::Metrics => self.metrics.as_ref(),
        }
    }

    /// Send one job and wait for the backend's answer.
    pub async fn send(&self, job: &PushJob) -> PushResult<()> {
        let endpoint = self
            .endpoint(job.target)
            .ok_or(PushError::Disabled(job.target))?;

        let response = self
            .http
            .post(&endpoint.url)
            .header(AUTHORIZATION, &endpoint.authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(job.body.clone())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PushError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
