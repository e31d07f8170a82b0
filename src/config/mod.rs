//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → TelemetryConfig (validated, immutable)
//!     → cloned into the push client, emitter and scheduler at start-up
//! ```
//!
//! # Design Decisions
//! - Config is static for the life of the process
//! - All fields have defaults to allow minimal configs
//! - An empty push URL disables that target instead of failing every push

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DispatchConfig, HttpHookConfig, ListenerConfig, LogFormat, LoggingConfig, MetricsConfig,
    ObservabilityConfig, SchedulerConfig, TelemetryConfig, DEFAULT_SOURCE,
};
pub use validation::ValidationError;
