//! HTTP observation subsystem.
//!
//! # Data Flow
//! ```text
//! request
//!     → middleware/observe.rs (start timer, capture request body)
//!     → caller's handlers
//!     → middleware/observe.rs (capture response body)
//!         → aggregator: count by verb
//!         → metric pusher: latency_service_endpoint
//!         → logger: http exchange (skip rules, level by status)
//!     → response
//! ```

pub mod middleware;
pub mod server;

pub use middleware::observe::observe_request;
pub use server::{demo_routes, instrument, HttpServer};
