//! Log event model and the label-indexed push envelope.
//!
//! ```text
//! { "streams": [ { "stream": {component, level, type},
//!                  "values": [[ "<ns-timestamp>", "<json payload>" ]] } ] }
//! ```

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Well-known log type tags. `emit` accepts any tag.
pub mod kind {
    pub const HTTP: &str = "http";
    pub const DATABASE: &str = "database";
    pub const FACTORY: &str = "factory";
    pub const EXCEPTION: &str = "exception";
    pub const PROMISE_REJECTION: &str = "promiseRejection";
}

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Map an HTTP status code to a level: 5xx error, 4xx warn, otherwise info.
    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            LogLevel::Error
        } else if status >= 400 {
            LogLevel::Warn
        } else {
            LogLevel::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stream labels the backend indexes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLabels {
    pub component: String,
    pub level: LogLevel,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One log record, built and shipped within a single `emit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub labels: LogLabels,
    /// Nanoseconds since the epoch, as a decimal string.
    pub timestamp: String,
    /// Redacted JSON payload.
    pub payload: String,
}

#[derive(Serialize)]
struct Stream<'a> {
    stream: &'a LogLabels,
    values: [[&'a str; 2]; 1],
}

#[derive(Serialize)]
struct Streams<'a> {
    streams: [Stream<'a>; 1],
}

impl LogEvent {
    /// Serialize into the push body.
    pub fn to_push_body(&self) -> serde_json::Result<String> {
        let body = Streams {
            streams: [Stream {
                stream: &self.labels,
                values: [[self.timestamp.as_str(), self.payload.as_str()]],
            }],
        };
        serde_json::to_string(&body)
    }
}

/// Current wall-clock time in nanoseconds, as a string.
///
/// Derived from the millisecond clock, so the last six digits are always zero.
pub fn now_nanos_string() -> String {
    (now_millis() * 1_000_000).to_string()
}

/// Current wall-clock time in nanoseconds at millisecond precision.
pub fn now_nanos() -> u64 {
    now_millis() * 1_000_000
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_level_from_status() {
        assert_eq!(LogLevel::from_status(200), LogLevel::Info);
        assert_eq!(LogLevel::from_status(302), LogLevel::Info);
        assert_eq!(LogLevel::from_status(400), LogLevel::Warn);
        assert_eq!(LogLevel::from_status(404), LogLevel::Warn);
        assert_eq!(LogLevel::from_status(500), LogLevel::Error);
        assert_eq!(LogLevel::from_status(503), LogLevel::Error);
    }

    #[test]
    fn test_push_body_shape() {
        let event = LogEvent {
            labels: LogLabels {
                component: "jwt-pizza-service".into(),
                level: LogLevel::Warn,
                kind: kind::HTTP.into(),
            },
            timestamp: "1700000000000000000".into(),
            payload: r#"{"a":1}"#.into(),
        };

        let body: Value = serde_json::from_str(&event.to_push_body().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "streams": [{
                    "stream": {"component": "jwt-pizza-service", "level": "warn", "type": "http"},
                    "values": [["1700000000000000000", "{\"a\":1}"]]
                }]
            })
        );
    }

    #[test]
    fn test_timestamp_millisecond_ceiling() {
        let ts = now_nanos_string();
        assert!(ts.ends_with("000000"));
        assert!(ts.len() >= 19);
    }
}
