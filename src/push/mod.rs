//! Outbound push subsystem.
//!
//! # Data Flow
//! ```text
//! LogEmitter / MetricPusher
//!     → PushSink::submit (non-blocking, bounded)
//!     → dispatcher.rs (one PushWorker per target, concurrent sends)
//!     → client.rs (POST + bearer auth)
//!     → log backend / metrics backend
//! ```
//!
//! # Design Decisions
//! - Fire-and-forget: producers never await a push
//! - A full queue drops the job instead of applying backpressure
//! - Logs and metrics are queued separately and never wait on each other
//! - Failures are logged once and discarded, never retried

pub mod client;
pub mod dispatcher;
pub mod types;

pub use client::PushClient;
pub use dispatcher::{channel, PushQueue, PushSink, PushWorker, SharedSink};
pub use types::{PushError, PushJob, PushResult, PushTarget};
