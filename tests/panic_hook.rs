//! Panic hook test. Lives in its own binary since the hook is process-wide.

use std::sync::Arc;

use serde_json::Value;

use pizza_telemetry::logger::{install_panic_hook, LogEmitter};

mod common;

use common::RecordingSink;

#[test]
fn test_panic_reported_as_exception() {
    let sink = Arc::new(RecordingSink::default());
    install_panic_hook(LogEmitter::new("jwt-pizza-service", sink.clone()));

    let result = std::thread::spawn(|| panic!("oven on fire")).join();
    assert!(result.is_err());

    let jobs = sink.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 1);

    let body: Value = serde_json::from_str(&jobs[0].body).unwrap();
    let stream = &body["streams"][0];
    assert_eq!(stream["stream"]["level"], "error");
    assert_eq!(stream["stream"]["type"], "exception");

    let payload: Value = serde_json::from_str(stream["values"][0][1].as_str().unwrap()).unwrap();
    assert_eq!(payload["message"], "oven on fire");
    assert!(payload["location"].as_str().unwrap().contains("panic_hook.rs"));
}
