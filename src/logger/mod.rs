//! Log emitter subsystem.
//!
//! # Data Flow
//! ```text
//! http hook / db / factory / panic hook / observed tasks
//!     → emitter.rs (LogEmitter::emit)
//!     → redact.rs (serialize, mask password/apiKey/token)
//!     → event.rs (labels + [ns timestamp, payload] streams envelope)
//!     → push queue (Logs target)
//! ```
//!
//! # Known limits
//! - Timestamps carry millisecond precision scaled to nanoseconds.
//! - Textual redaction only sees flat string values; embedded bodies are
//!   masked structurally before they are stringified.

pub mod emitter;
pub mod event;
pub mod hooks;
pub mod http;
pub mod redact;

pub use emitter::{embed, LogEmitter};
pub use event::{kind, LogEvent, LogLabels, LogLevel};
pub use hooks::{install_panic_hook, spawn_observed};
pub use http::{should_log, CapturedBody, HttpExchange, NOT_CAPTURED};
pub use redact::{redact_text, redact_value, sanitize, stringify, MASK, UNSERIALIZABLE};
