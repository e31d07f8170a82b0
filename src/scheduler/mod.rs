//! Periodic flush scheduler.
//!
//! # Data Flow
//! ```text
//! timer (default 60s)
//!     → aggregator snapshot + system.rs (load average, memory)
//!     → flush.rs collect_batch
//!     → MetricPusher (one envelope per metric)
//! ```
//!
//! Not started in test mode.

pub mod flush;
pub mod system;

pub use flush::{collect_batch, BatchItem, FlushScheduler};
pub use system::{HostSampler, ResourceSampler, SystemUsage};
