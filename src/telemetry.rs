//! Handle passed to everything that records telemetry.

use std::sync::Arc;

use crate::aggregator::{MetricPusher, MetricsAggregator};
use crate::config::TelemetryConfig;
use crate::logger::LogEmitter;
use crate::push::SharedSink;

/// Cloneable bundle of the emitter, the shared aggregator and the metric pusher.
#[derive(Clone)]
pub struct Telemetry {
    pub logger: LogEmitter,
    pub aggregator: Arc<MetricsAggregator>,
    pub metrics: MetricPusher,
    /// Body capture limit for the HTTP hook.
    pub max_capture_bytes: usize,
}

impl Telemetry {
    /// Build the handle over an arbitrary sink.
    pub fn with_sink(config: &TelemetryConfig, sink: SharedSink) -> Self {
        Self {
            logger: LogEmitter::from_config(&config.metrics, sink.clone()),
            aggregator: Arc::new(MetricsAggregator::new()),
            metrics: MetricPusher::new(sink),
            max_capture_bytes: config.http.max_capture_bytes,
        }
    }
}
