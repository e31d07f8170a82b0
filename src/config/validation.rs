//! Configuration validation.
//!
//! Serde handles syntax; this checks values. Validation is a pure function
//! that reports every problem, not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::TelemetryConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &TelemetryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url("logging.url", &config.logging.url, &mut errors);
    check_url("metrics.url", &config.metrics.url, &mut errors);

    if config.scheduler.interval_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "scheduler.interval_secs" });
    }
    if config.dispatch.queue_capacity == 0 {
        errors.push(ValidationError::NotPositive { field: "dispatch.queue_capacity" });
    }
    if config.dispatch.max_in_flight == 0 {
        errors.push(ValidationError::NotPositive { field: "dispatch.max_in_flight" });
    }
    if config.dispatch.request_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "dispatch.request_timeout_secs" });
    }

    check_addr("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_addr(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Empty means the target is disabled.
fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        return;
    }
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn check_addr(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
