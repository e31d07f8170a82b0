//! HTTP exchange logging.
//!
//! Decides whether a finished request/response exchange is logged and
//! builds the `http` log payload from it.

use serde::Serialize;
use serde_json::Value;

use crate::logger::emitter::{embed_value, LogEmitter};
use crate::logger::event::{kind, LogLevel};
use crate::logger::redact::stringify;

/// API documentation is never logged.
pub const DOCS_PREFIX: &str = "/api/docs";

/// 404s outside this prefix are not logged.
pub const API_PREFIX: &str = "/api/";

/// Logged in place of a body that was not buffered.
pub const NOT_CAPTURED: &str = "[body not captured]";

/// A request or response body as captured by the observation hook.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedBody {
    Empty,
    Json(Value),
    Text(String),
    /// Over the capture limit or of unknown length; not buffered.
    NotCaptured,
}

impl CapturedBody {
    /// Classify raw body bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return CapturedBody::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => CapturedBody::Json(value),
            Err(_) => CapturedBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    fn render(&self) -> Option<String> {
        match self {
            CapturedBody::Empty => None,
            CapturedBody::Json(value) => Some(embed_value(value.clone())),
            CapturedBody::Text(text) => Some(stringify(text)),
            CapturedBody::NotCaptured => Some(NOT_CAPTURED.to_string()),
        }
    }
}

/// A completed request/response exchange.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    pub method: String,
    /// Original path including the query string.
    pub path: String,
    pub status: u16,
    /// Whether an Authorization header was present (not whether it was valid).
    pub authorized: bool,
    pub request_body: CapturedBody,
    pub response_body: CapturedBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpLog<'a> {
    method: &'a str,
    path: &'a str,
    status_code: u16,
    authorized: bool,
    req_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    res_body: Option<String>,
}

/// Whether an exchange on `path` finishing with `status` is logged.
pub fn should_log(path: &str, status: u16) -> bool {
    if path.starts_with(DOCS_PREFIX) {
        return false;
    }
    !(status == 404 && !path.starts_with(API_PREFIX))
}

impl LogEmitter {
    /// Log a finished exchange. Returns whether an event was emitted.
    pub fn http(&self, exchange: &HttpExchange) -> bool {
        if !should_log(&exchange.path, exchange.status) {
            return false;
        }

        let data = HttpLog {
            method: &exchange.method,
            path: &exchange.path,
            status_code: exchange.status,
            authorized: exchange.authorized,
            req_body: exchange
                .request_body
                .render()
                .unwrap_or_else(|| "{}".to_string()),
            res_body: exchange.response_body.render(),
        };

        self.emit(LogLevel::from_status(exchange.status), kind::HTTP, &data);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::emitter::tests::emitter;
    use serde_json::json;

    fn exchange(path: &str, status: u16) -> HttpExchange {
        HttpExchange {
            method: "PUT".into(),
            path: path.into(),
            status,
            authorized: false,
            request_body: CapturedBody::Empty,
            response_body: CapturedBody::Empty,
        }
    }

    #[test]
    fn test_docs_never_logged() {
        let (emitter, sink) = emitter();
        for status in [200, 404, 500] {
            assert!(!emitter.http(&exchange("/api/docs", status)));
            assert!(!emitter.http(&exchange("/api/docs/anything", status)));
        }
        assert!(sink.jobs.lock().unwrap().is_empty());
    }

    #[test]
    fn test_not_found_outside_api_skipped() {
        let (emitter, sink) = emitter();
        assert!(!emitter.http(&exchange("/favicon.ico", 404)));
        assert!(!emitter.http(&exchange("/api", 404)));
        assert!(emitter.http(&exchange("/api/unknown", 404)));
        assert!(emitter.http(&exchange("/favicon.ico", 500)));
        assert_eq!(sink.jobs.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_http_payload() {
        let (emitter, sink) = emitter();
        let exchange = HttpExchange {
            method: "PUT".into(),
            path: "/api/auth?x=1".into(),
            status: 401,
            authorized: true,
            request_body: CapturedBody::from_bytes(br#"{"email":"d@jwt.com","password":"diner"}"#),
            response_body: CapturedBody::from_bytes(b"unknown user"),
        };
        assert!(emitter.http(&exchange));

        let bodies = sink.bodies();
        let stream = &bodies[0]["streams"][0];
        assert_eq!(stream["stream"]["level"], "warn");
        assert_eq!(stream["stream"]["type"], "http");

        let payload = stream["values"][0][1].as_str().unwrap();
        assert!(!payload.contains("diner\\\""));
        let log: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(log["method"], "PUT");
        assert_eq!(log["path"], "/api/auth?x=1");
        assert_eq!(log["statusCode"], 401);
        assert_eq!(log["authorized"], true);
        assert_eq!(log["resBody"], "\"unknown user\"");

        let req: Value = serde_json::from_str(log["reqBody"].as_str().unwrap()).unwrap();
        assert_eq!(req, json!({"email": "d@jwt.com", "password": "*****"}));
    }

    #[test]
    fn test_empty_bodies() {
        let (emitter, sink) = emitter();
        emitter.http(&exchange("/api/order", 200));

        let bodies = sink.bodies();
        let log: Value =
            serde_json::from_str(bodies[0]["streams"][0]["values"][0][1].as_str().unwrap()).unwrap();
        assert_eq!(log["reqBody"], "{}");
        assert!(log.get("resBody").is_none());
        assert_eq!(bodies[0]["streams"][0]["stream"]["level"], "info");
    }

    #[test]
    fn test_captured_body_classification() {
        assert_eq!(CapturedBody::from_bytes(b""), CapturedBody::Empty);
        assert_eq!(CapturedBody::from_bytes(b"[1,2]"), CapturedBody::Json(json!([1, 2])));
        assert_eq!(CapturedBody::from_bytes(b"hello"), CapturedBody::Text("hello".into()));
        assert_eq!(CapturedBody::NotCaptured.render().unwrap(), NOT_CAPTURED);
        assert_ne!(NOT_CAPTURED, crate::logger::redact::UNSERIALIZABLE);
    }
}
