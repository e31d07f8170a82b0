//! Log emitter.
//!
//! # Responsibilities
//! - Build labelled log events from arbitrary serializable payloads
//! - Redact secrets before anything leaves the process
//! - Hand the push body to the dispatch queue without waiting
//!
//! `emit` never fails and never blocks: a payload that cannot be serialized
//! becomes a placeholder, and delivery problems only reach the diagnostic log.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::MetricsConfig;
use crate::logger::event::{kind, now_nanos_string, LogEvent, LogLabels, LogLevel};
use crate::logger::redact::{redact_value, sanitize, stringify, UNSERIALIZABLE};
use crate::push::{PushJob, PushTarget, SharedSink};

/// Cheap-to-clone handle for emitting log events.
#[derive(Clone)]
pub struct LogEmitter {
    component: Arc<str>,
    sink: SharedSink,
}

impl LogEmitter {
    /// Create an emitter labelling every stream with `component`.
    pub fn new(component: impl Into<String>, sink: SharedSink) -> Self {
        Self {
            component: Arc::from(component.into()),
            sink,
        }
    }

    /// Create an emitter using the configured source label.
    pub fn from_config(config: &MetricsConfig, sink: SharedSink) -> Self {
        Self::new(config.component(), sink)
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// Build the event for a payload without shipping it.
    pub fn build<T: Serialize + ?Sized>(&self, level: LogLevel, kind: &str, data: &T) -> LogEvent {
        LogEvent {
            labels: LogLabels {
                component: self.component.to_string(),
                level,
                kind: kind.to_string(),
            },
            timestamp: now_nanos_string(),
            payload: sanitize(data),
        }
    }

    /// Emit one log event.
    pub fn emit<T: Serialize + ?Sized>(&self, level: LogLevel, kind: &str, data: &T) {
        let event = self.build(level, kind, data);
        match event.to_push_body() {
            Ok(body) => self.sink.submit(PushJob::new(PushTarget::Logs, kind, body)),
            Err(e) => tracing::error!(error = %e, kind, "Failed to encode log event"),
        }
    }

    /// Log a database query.
    pub fn db(&self, query: &str) {
        #[derive(Serialize)]
        struct DbLog<'a> {
            query: &'a str,
        }

        self.emit(LogLevel::Info, kind::DATABASE, &DbLog { query });
    }

    /// Log a call to the external pizza factory.
    pub fn factory<Req, Res>(&self, request_body: &Req, response_body: &Res, success: bool)
    where
        Req: Serialize + ?Sized,
        Res: Serialize + ?Sized,
    {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct FactoryLog {
            request_body: String,
            response_body: String,
        }

        let level = if success { LogLevel::Info } else { LogLevel::Error };
        let data = FactoryLog {
            request_body: embed(request_body),
            response_body: embed(response_body),
        };
        self.emit(level, kind::FACTORY, &data);
    }
}

/// Stringify a nested payload for embedding as a string field.
///
/// Sensitive keys are masked structurally first, since the textual pass
/// cannot see through the escaped quotes of an embedded document.
pub fn embed<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(mut tree) => {
            redact_value(&mut tree);
            stringify(&tree)
        }
        Err(_) => UNSERIALIZABLE.to_string(),
    }
}

/// Convenience for redacting an already-decoded body.
pub(crate) fn embed_value(mut tree: Value) -> String {
    redact_value(&mut tree);
    stringify(&tree)
}
