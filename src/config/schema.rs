//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the telemetry
//! pipeline. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Component label used when `metrics.source` is not set.
pub const DEFAULT_SOURCE: &str = "jwt-pizza-service";

/// Root configuration for the telemetry pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Log-aggregation push endpoint.
    pub logging: LoggingConfig,

    /// Metrics-ingestion push endpoint.
    pub metrics: MetricsConfig,

    /// Periodic flush settings.
    pub scheduler: SchedulerConfig,

    /// Outbound dispatch queue settings.
    pub dispatch: DispatchConfig,

    /// HTTP observation hook settings.
    pub http: HttpHookConfig,

    /// Demo host listener.
    pub listener: ListenerConfig,

    /// Diagnostics of the pipeline itself.
    pub observability: ObservabilityConfig,

    /// Disables the flush scheduler and the log-push rejection diagnostic.
    pub test_mode: bool,
}

/// Log push endpoint (`Authorization: Bearer <user_id>:<api_key>`).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Push URL. Empty disables log pushes.
    pub url: String,

    #[serde(alias = "userId")]
    pub user_id: String,

    #[serde(alias = "apiKey")]
    pub api_key: String,
}

/// Metric push endpoint (`Authorization: Bearer <api_key>`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Push URL. Empty disables metric pushes.
    pub url: String,

    #[serde(alias = "apiKey")]
    pub api_key: String,

    /// Component label attached to every log stream.
    pub source: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl MetricsConfig {
    /// The component label, falling back to the default when blank.
    pub fn component(&self) -> &str {
        if self.source.trim().is_empty() {
            DEFAULT_SOURCE
        } else {
            &self.source
        }
    }
}

/// Flush scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Tick period in seconds.
    pub interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// Dispatch queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum number of pending push jobs per target. Jobs beyond this are dropped.
    pub queue_capacity: usize,

    /// Pushes in flight at once, per target.
    pub max_in_flight: usize,

    /// Per-push request timeout in seconds.
    pub request_timeout_secs: u64,

    /// How long the worker keeps draining queued jobs after shutdown.
    pub drain_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            max_in_flight: 16,
            request_timeout_secs: 10,
            drain_timeout_secs: 5,
        }
    }
}

/// HTTP observation hook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpHookConfig {
    /// Bodies larger than this are not captured into logs.
    pub max_capture_bytes: usize,
}

impl Default for HttpHookConfig {
    fn default() -> Self {
        Self {
            max_capture_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Listener configuration for the demo host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Output format for the diagnostic log.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration for the pipeline's own diagnostics.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Diagnostic log format.
    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint for self-metrics.
    pub metrics_enabled: bool,

    /// Self-metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
