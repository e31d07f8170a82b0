//! Push job and error definitions.

use std::fmt;
use thiserror::Error;

/// Backend a push job is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushTarget {
    /// Label-indexed log-aggregation endpoint.
    Logs,
    /// OTel-style metrics-ingestion endpoint.
    Metrics,
}

impl PushTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushTarget::Logs => "logs",
            PushTarget::Metrics => "metrics",
        }
    }
}

impl fmt::Display for PushTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A serialized payload waiting to be POSTed.
#[derive(Debug, Clone, PartialEq)]
pub struct PushJob {
    pub target: PushTarget,
    /// Metric name or log type, for diagnostics only.
    pub label: String,
    /// JSON request body.
    pub body: String,
}

impl PushJob {
    pub fn new(target: PushTarget, label: impl Into<String>, body: String) -> Self {
        Self {
            target,
            label: label.into(),
            body,
        }
    }
}

/// Errors that can occur while sending a push job.
#[derive(Debug, Error)]
pub enum PushError {
    /// Request could not be sent or timed out.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("backend rejected push with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// No URL configured for the target.
    #[error("{0} push target is not configured")]
    Disabled(PushTarget),
}

/// Result type for push operations.
pub type PushResult<T> = Result<T, PushError>;
