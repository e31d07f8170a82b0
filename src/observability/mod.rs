//! Observability of the pipeline itself.
//!
//! # Data Flow
//! ```text
//! push worker, scheduler, queue
//!     → logging.rs (tracing events: the diagnostic output)
//!     → metrics.rs (counters and histograms about pushes and ticks)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;
