//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → push client → queue + worker → scheduler
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → trigger → scheduler stops, worker drains (bounded) → exit
//! ```
//!
//! Jobs still queued when the drain deadline passes are lost.

pub mod shutdown;
pub mod startup;

pub use shutdown::{trigger_on_ctrl_c, Shutdown};
pub use startup::{start_pipeline, Pipeline};
