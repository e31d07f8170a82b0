//! Self-metrics of the telemetry pipeline.
//!
//! # Metrics
//! - `telemetry_push_total` (counter): push attempts by target, outcome
//! - `telemetry_push_dropped_total` (counter): jobs dropped before sending
//! - `telemetry_push_duration_seconds` (histogram): time spent per push
//! - `telemetry_scheduler_ticks_total` (counter): flush ticks by outcome
//!
//! Without an installed recorder these calls are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::push::PushTarget;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Self-metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

pub fn record_push(target: PushTarget, outcome: &'static str) {
    counter!("telemetry_push_total", "target" => target.as_str(), "outcome" => outcome).increment(1);
}

pub fn record_push_duration(target: PushTarget, start: Instant) {
    histogram!("telemetry_push_duration_seconds", "target" => target.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_dropped(target: PushTarget) {
    counter!("telemetry_push_dropped_total", "target" => target.as_str()).increment(1);
}

pub fn record_tick(outcome: &'static str) {
    counter!("telemetry_scheduler_ticks_total", "outcome" => outcome).increment(1);
}
