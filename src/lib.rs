//! Embedded telemetry pipeline for the pizza service.
//!
//! Captures structured log events and numeric metrics from application code
//! and ships them, asynchronously and best-effort, to a log-aggregation push
//! endpoint and a metrics-ingestion push endpoint.

pub mod aggregator;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod push;
pub mod scheduler;
pub mod telemetry;

pub use config::TelemetryConfig;
pub use lifecycle::{start_pipeline, Pipeline, Shutdown};
pub use telemetry::Telemetry;
