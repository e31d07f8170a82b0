//! Bounded best-effort dispatch of push jobs.
//!
//! Producers hand jobs to a [`PushQueue`] without waiting. Each target has
//! its own bounded queue and [`PushWorker`], so a stalled log backend cannot
//! crowd out metric pushes. Every failure ends in the diagnostic log and
//! never reaches the producer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio::time;

use crate::config::DispatchConfig;
use crate::observability::metrics;
use crate::push::client::PushClient;
use crate::push::types::{PushError, PushJob, PushTarget};

/// Anything that accepts push jobs without blocking.
pub trait PushSink: Send + Sync {
    /// Hand over a job. Never blocks and never fails from the caller's view.
    fn submit(&self, job: PushJob);
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn PushSink>;

/// Producer side of the dispatch channels, one per target.
#[derive(Debug, Clone)]
pub struct PushQueue {
    logs: mpsc::Sender<PushJob>,
    metrics: mpsc::Sender<PushJob>,
}

impl PushSink for PushQueue {
    fn submit(&self, job: PushJob) {
        let tx = match job.target {
            PushTarget::Logs => &self.logs,
            PushTarget::Metrics => &self.metrics,
        };
        match tx.try_send(job) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(job)) => {
                tracing::warn!(target_kind = %job.target, label = %job.label, "Push queue full, dropping job");
                metrics::record_dropped(job.target);
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                tracing::debug!(target_kind = %job.target, label = %job.label, "Push queue closed, dropping job");
                metrics::record_dropped(job.target);
            }
        }
    }
}

/// Consumer side of one target's channel.
///
/// Jobs are sent concurrently, up to the in-flight limit, so a slow send
/// never holds up the jobs queued behind it.
pub struct PushWorker {
    target: PushTarget,
    rx: mpsc::Receiver<PushJob>,
    client: PushClient,
    limit: Arc<Semaphore>,
    in_flight: JoinSet<()>,
    drain_timeout: Duration,
}

/// Create the dispatch channels. Workers come back in `[Logs, Metrics]` order.
pub fn channel(config: &DispatchConfig, client: PushClient) -> (PushQueue, Vec<PushWorker>) {
    let capacity = config.queue_capacity.max(1);
    let (logs, logs_rx) = mpsc::channel(capacity);
    let (metrics, metrics_rx) = mpsc::channel(capacity);

    let worker = |target, rx| PushWorker {
        target,
        rx,
        client: client.clone(),
        limit: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
        in_flight: JoinSet::new(),
        drain_timeout: Duration::from_secs(config.drain_timeout_secs),
    };
    let workers = vec![
        worker(PushTarget::Logs, logs_rx),
        worker(PushTarget::Metrics, metrics_rx),
    ];

    (PushQueue { logs, metrics }, workers)
}

impl PushWorker {
    pub fn target(&self) -> PushTarget {
        self.target
    }

    /// Run until shutdown, then drain what is queued or in flight.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(target_kind = %self.target, "Push worker starting");

        loop {
            tokio::select! {
                job = self.rx.recv() => {
                    match job {
                        Some(job) => self.start(job).await,
                        None => {
                            tracing::info!(target_kind = %self.target, "All push producers dropped");
                            break;
                        }
                    }
                }
                Some(result) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    reap(result);
                }
                _ = shutdown.recv() => {
                    tracing::info!(target_kind = %self.target, "Push worker received shutdown signal, draining queue");
                    break;
                }
            }
        }

        self.drain().await;
    }

    /// Wait for an in-flight slot, then send `job` in the background.
    async fn start(&mut self, job: PushJob) {
        let Ok(permit) = self.limit.clone().acquire_owned().await else {
            return;
        };
        let client = self.client.clone();
        self.in_flight.spawn(async move {
            dispatch(&client, job).await;
            drop(permit);
        });
    }

    async fn drain(&mut self) {
        self.rx.close();
        let deadline = time::Instant::now() + self.drain_timeout;

        let finished = time::timeout_at(deadline, async {
            while let Ok(job) = self.rx.try_recv() {
                self.start(job).await;
            }
            while let Some(result) = self.in_flight.join_next().await {
                reap(result);
            }
        })
        .await;

        if finished.is_err() {
            tracing::warn!(
                target_kind = %self.target,
                left = self.rx.len() + self.in_flight.len(),
                "Drain deadline reached, discarding queued jobs"
            );
            self.in_flight.abort_all();
        } else {
            tracing::info!(target_kind = %self.target, "Push worker drained");
        }
    }
}

fn reap(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!(error = %e, "Push task panicked");
        }
    }
}

async fn dispatch(client: &PushClient, job: PushJob) {
    let start = Instant::now();
    let result = client.send(&job).await;
    report(&job, result, client.quiet_log_rejections());
    metrics::record_push_duration(job.target, start);
}

/// Whether a non-2xx answer for `target` goes to the diagnostic log.
/// Log rejections are silenced in test mode; metric rejections never are.
fn rejection_reported(target: PushTarget, quiet_log_rejections: bool) -> bool {
    !(target == PushTarget::Logs && quiet_log_rejections)
}

/// Write the outcome of one push to the diagnostic sink.
fn report(job: &PushJob, result: Result<(), PushError>, quiet_log_rejections: bool) {
    match result {
        Ok(()) => {
            metrics::record_push(job.target, "ok");
            if job.target == PushTarget::Metrics {
                tracing::debug!(metric = %job.label, "Pushed {}", job.label);
            }
        }
        Err(PushError::Disabled(target)) => {
            metrics::record_push(target, "disabled");
            tracing::debug!(target_kind = %target, label = %job.label, "Push target not configured, discarding");
        }
        Err(PushError::Rejected { status, body }) => {
            metrics::record_push(job.target, "rejected");
            if !rejection_reported(job.target, quiet_log_rejections) {
                return;
            }
            match job.target {
                PushTarget::Logs => {
                    tracing::warn!(status, body = %body, "Log push failed");
                }
                PushTarget::Metrics => {
                    tracing::error!(metric = %job.label, status, body = %body, "Failed to push {}", job.label);
                }
            }
        }
        Err(e @ PushError::Transport(_)) => {
            metrics::record_push(job.target, "transport_error");
            tracing::error!(target_kind = %job.target, label = %job.label, error = %e, "Push failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetryConfig;

    fn workers(capacity: usize) -> (PushQueue, Vec<PushWorker>) {
        let config = TelemetryConfig::default();
        let client = PushClient::new(&config).unwrap();
        let dispatch = DispatchConfig {
            queue_capacity: capacity,
            drain_timeout_secs: 1,
            ..config.dispatch
        };
        channel(&dispatch, client)
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (queue, mut workers) = workers(1);
        queue.submit(PushJob::new(PushTarget::Logs, "a", "{}".into()));
        queue.submit(PushJob::new(PushTarget::Logs, "b", "{}".into()));

        assert_eq!(workers[0].target(), PushTarget::Logs);
        assert_eq!(workers[0].rx.try_recv().unwrap().label, "a");
        assert!(workers[0].rx.try_recv().is_err());
    }

    #[test]
    fn test_targets_have_separate_queues() {
        let (queue, mut workers) = workers(1);
        queue.submit(PushJob::new(PushTarget::Logs, "http", "{}".into()));
        queue.submit(PushJob::new(PushTarget::Logs, "database", "{}".into()));
        queue.submit(PushJob::new(PushTarget::Metrics, "pizzas_sold", "{}".into()));

        assert_eq!(workers[1].target(), PushTarget::Metrics);
        assert_eq!(workers[1].rx.try_recv().unwrap().label, "pizzas_sold");
    }

    #[test]
    fn test_submit_after_worker_gone() {
        let (queue, workers) = workers(4);
        drop(workers);
        queue.submit(PushJob::new(PushTarget::Metrics, "cpu_usage", "{}".into()));
    }

    #[test]
    fn test_rejection_reporting_rules() {
        assert!(rejection_reported(PushTarget::Logs, false));
        assert!(!rejection_reported(PushTarget::Logs, true));
        assert!(rejection_reported(PushTarget::Metrics, false));
        assert!(rejection_reported(PushTarget::Metrics, true));
    }

    #[test]
    fn test_test_mode_quiets_log_rejections() {
        let mut config = TelemetryConfig::default();
        assert!(!PushClient::new(&config).unwrap().quiet_log_rejections());

        config.test_mode = true;
        let client = PushClient::new(&config).unwrap();
        assert!(!rejection_reported(PushTarget::Logs, client.quiet_log_rejections()));
        assert!(rejection_reported(PushTarget::Metrics, client.quiet_log_rejections()));
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue() {
        let (queue, workers) = workers(8);
        for i in 0..3 {
            queue.submit(PushJob::new(PushTarget::Metrics, format!("m{i}"), "{}".into()));
            queue.submit(PushJob::new(PushTarget::Logs, format!("l{i}"), "{}".into()));
        }

        let (tx, _) = broadcast::channel(1);
        let handles: Vec<_> = workers
            .into_iter()
            .map(|w| tokio::spawn(w.run(tx.subscribe())))
            .collect();
        tx.send(()).unwrap();

        for handle in handles {
            time::timeout(Duration::from_secs(2), handle)
                .await
                .expect("worker should exit after draining")
                .unwrap();
        }
    }
}
