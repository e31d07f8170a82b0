//! Metric push path.

use crate::aggregator::envelope::{MetricEnvelope, MetricKind, MetricValue};
use crate::logger::event::now_nanos;
use crate::push::{PushJob, PushTarget, SharedSink};

/// Serializes single observations and queues them for the metrics backend.
#[derive(Clone)]
pub struct MetricPusher {
    sink: SharedSink,
}

impl MetricPusher {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }

    /// Queue one observation. Never blocks.
    pub fn push(&self, name: &str, value: impl Into<MetricValue>, kind: MetricKind, unit: &str) {
        let envelope = MetricEnvelope::new(name, value, kind, unit, now_nanos());
        self.push_envelope(&envelope);
    }

    pub fn push_envelope(&self, envelope: &MetricEnvelope) {
        match envelope.to_body() {
            Ok(body) => self
                .sink
                .submit(PushJob::new(PushTarget::Metrics, envelope.name.as_str(), body)),
            Err(e) => tracing::error!(metric = %envelope.name, error = %e, "Failed to encode metric"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::emitter::tests::RecordingSink;
    use std::sync::Arc;

    #[test]
    fn test_push_queues_metric_job() {
        let sink = Arc::new(RecordingSink::default());
        let pusher = MetricPusher::new(sink.clone());
        pusher.push("latency_service_endpoint", 12.5, MetricKind::Sum, "ms");

        let jobs = sink.jobs.lock().unwrap().clone();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].target, PushTarget::Metrics);
        assert_eq!(jobs[0].label, "latency_service_endpoint");

        let body = &sink.bodies()[0];
        let metric = &body["resourceMetrics"][0]["scopeMetrics"][0]["metrics"][0];
        assert_eq!(metric["unit"], "ms");
        assert_eq!(metric["sum"]["dataPoints"][0]["asDouble"], 12.5);
        assert!(metric["sum"]["dataPoints"][0]["timeUnixNano"].as_u64().unwrap() > 0);
    }
}
