//! Process-scope last-resort hooks.
//!
//! Panics and failed background tasks are reported as `error` events. These
//! hooks observe; they do not recover. A panicking thread still unwinds.

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::future::Future;

use serde_json::json;
use tokio::task::JoinHandle;

use crate::logger::emitter::LogEmitter;
use crate::logger::event::{kind, LogLevel};

/// Report every panic as an `exception` event, then run the previous hook.
pub fn install_panic_hook(emitter: LogEmitter) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let message = panic_message(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_default();
        let stack = Backtrace::force_capture().to_string();

        emitter.emit(
            LogLevel::Error,
            kind::EXCEPTION,
            &json!({
                "message": message,
                "location": location,
                "stack": stack,
            }),
        );

        previous(info);
    }));
}

/// Spawn a fallible background task whose failure is reported as a
/// `promiseRejection` event instead of disappearing with its handle.
pub fn spawn_observed<F, E>(emitter: LogEmitter, task: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        let reason = match tokio::spawn(task).await {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(e) if e.is_panic() => format!("task panicked: {}", panic_message(&*e.into_panic())),
            Err(_) => return,
        };

        emitter.emit(
            LogLevel::Error,
            kind::PROMISE_REJECTION,
            &json!({ "reason": reason }),
        );
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
