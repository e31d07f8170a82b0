//! Periodic flush of aggregated metrics.
//!
//! # Responsibilities
//! - Snapshot the aggregator and the host on a fixed period
//! - Queue one push per tracked metric
//! - Survive a failing tick

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::aggregator::{MetricKind, MetricPusher, MetricValue, MetricsAggregator, MetricsSnapshot};
use crate::observability::metrics;
use crate::scheduler::system::{round2, HostSampler, ResourceSampler, SystemUsage};

/// One metric queued by a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub name: &'static str,
    pub value: MetricValue,
    pub kind: MetricKind,
    pub unit: &'static str,
}

impl BatchItem {
    fn new(name: &'static str, value: impl Into<MetricValue>, kind: MetricKind, unit: &'static str) -> Self {
        Self {
            name,
            value: value.into(),
            kind,
            unit,
        }
    }
}

/// Everything a tick pushes, in push order.
pub fn collect_batch(snapshot: &MetricsSnapshot, usage: SystemUsage) -> Vec<BatchItem> {
    use MetricKind::{Gauge, Sum};

    vec![
        BatchItem::new("http_total_requests", snapshot.http.total, Sum, "1"),
        BatchItem::new("http_get_requests", snapshot.http.get, Sum, "1"),
        BatchItem::new("http_post_requests", snapshot.http.post, Sum, "1"),
        BatchItem::new("http_put_requests", snapshot.http.put, Sum, "1"),
        BatchItem::new("http_delete_requests", snapshot.http.delete, Sum, "1"),
        BatchItem::new("active_users", snapshot.active_users, Gauge, "1"),
        BatchItem::new("auth_success", snapshot.auth_success, Sum, "1"),
        BatchItem::new("auth_failure", snapshot.auth_failure, Sum, "1"),
        BatchItem::new("cpu_usage", usage.cpu_percent, Gauge, "%"),
        BatchItem::new("memory_usage", usage.memory_percent, Gauge, "%"),
        BatchItem::new("pizzas_sold", snapshot.pizzas_sold, Sum, "1"),
        BatchItem::new("pizza_failures", snapshot.pizza_failures, Sum, "1"),
        BatchItem::new("pizza_revenue", round2(snapshot.revenue), Sum, "USD"),
        BatchItem::new("latency_pizza_creation", snapshot.average_pizza_latency(), Sum, "ms"),
    ]
}

/// Background task flushing the aggregator on a fixed period.
///
/// Ticks run back to back on one task and are assumed to finish well within
/// the period; queuing is non-blocking, so they normally do.
pub struct FlushScheduler<S = HostSampler> {
    aggregator: Arc<MetricsAggregator>,
    pusher: MetricPusher,
    sampler: S,
    interval: Duration,
}

impl FlushScheduler<HostSampler> {
    pub fn new(aggregator: Arc<MetricsAggregator>, pusher: MetricPusher, interval: Duration) -> Self {
        Self::with_sampler(aggregator, pusher, HostSampler::new(), interval)
    }
}

impl<S: ResourceSampler> FlushScheduler<S> {
    pub fn with_sampler(
        aggregator: Arc<MetricsAggregator>,
        pusher: MetricPusher,
        sampler: S,
        interval: Duration,
    ) -> Self {
        Self {
            aggregator,
            pusher,
            sampler,
            interval,
        }
    }

    /// Queue one batch. Returns the number of metrics queued.
    pub fn tick(&mut self) -> usize {
        let snapshot = self.aggregator.snapshot();
        let usage = self.sampler.sample();
        let batch = collect_batch(&snapshot, usage);

        for item in &batch {
            self.pusher.push(item.name, item.value, item.kind, item.unit);
        }
        batch.len()
    }

    /// Run until shutdown. The first tick fires one period after start.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval = ?self.interval, "Flush scheduler starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match panic::catch_unwind(AssertUnwindSafe(|| self.tick())) {
                        Ok(count) => {
                            metrics::record_tick("ok");
                            tracing::debug!(count, "Flush tick queued metrics");
                        }
                        Err(_) => {
                            metrics::record_tick("panic");
                            tracing::error!("Flush tick panicked, continuing");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Flush scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
