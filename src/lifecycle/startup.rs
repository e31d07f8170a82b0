//! Pipeline start-up.
//!
//! Order: push client → dispatch queues and workers → telemetry handle →
//! flush scheduler (skipped in test mode).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::TelemetryConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::push::{self, PushClient, PushResult};
use crate::scheduler::FlushScheduler;
use crate::telemetry::Telemetry;

/// A running pipeline.
pub struct Pipeline {
    pub telemetry: Telemetry,
    workers: Vec<JoinHandle<()>>,
    scheduler: Option<JoinHandle<()>>,
}

/// Start the push workers and, outside test mode, the flush scheduler.
pub fn start_pipeline(config: &TelemetryConfig, shutdown: &Shutdown) -> PushResult<Pipeline> {
    let client = PushClient::new(config)?;
    let (queue, workers) = push::channel(&config.dispatch, client);

    let telemetry = Telemetry::with_sink(config, Arc::new(queue));
    let workers = workers
        .into_iter()
        .map(|worker| tokio::spawn(worker.run(shutdown.subscribe())))
        .collect();

    let scheduler = if config.test_mode {
        tracing::info!("Test mode: flush scheduler disabled");
        None
    } else {
        let scheduler = FlushScheduler::new(
            telemetry.aggregator.clone(),
            telemetry.metrics.clone(),
            Duration::from_secs(config.scheduler.interval_secs),
        );
        Some(tokio::spawn(scheduler.run(shutdown.subscribe())))
    };

    tracing::info!(
        component = telemetry.logger.component(),
        logs_enabled = !config.logging.url.is_empty(),
        metrics_enabled = !config.metrics.url.is_empty(),
        "Telemetry pipeline started"
    );

    Ok(Pipeline {
        telemetry,
        workers,
        scheduler,
    })
}

impl Pipeline {
    pub fn scheduler_running(&self) -> bool {
        self.scheduler.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the background tasks after shutdown has been triggered.
    pub async fn join(self) {
        if let Some(scheduler) = self.scheduler {
            if let Err(e) = scheduler.await {
                tracing::error!(error = %e, "Flush scheduler task failed");
            }
        }
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Push worker task failed");
            }
        }
    }
}
