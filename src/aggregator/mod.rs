//! Metric aggregator subsystem.
//!
//! # Data Flow
//! ```text
//! request handlers
//!     → state.rs (record_* : atomic, in-memory, cheap)
//!
//! scheduler tick / http hook
//!     → state.rs snapshot
//!     → envelope.rs (one data point per envelope, asInt vs asDouble)
//!     → pusher.rs → push queue (Metrics target)
//! ```
//!
//! # Design Decisions
//! - No ambient singleton: one `Arc<MetricsAggregator>` is passed around
//! - Every counter is a cumulative monotonic sum; active users is a gauge

pub mod envelope;
pub mod pusher;
pub mod state;

pub use envelope::{MetricEnvelope, MetricKind, MetricValue};
pub use pusher::MetricPusher;
pub use state::{HttpCounts, MetricsAggregator, MetricsSnapshot};
