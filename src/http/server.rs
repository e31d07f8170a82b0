//! HTTP server wiring.
//!
//! # Responsibilities
//! - Wrap a caller's router with the observation middleware
//! - Serve the demo host with graceful shutdown

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::http::middleware::observe::observe_request;
use crate::lifecycle::Shutdown;
use crate::telemetry::Telemetry;

/// Put the observation hook in front of every route of `router`.
pub fn instrument(router: Router, telemetry: Telemetry) -> Router {
    router
        .layer(middleware::from_fn_with_state(telemetry, observe_request))
        .layer(TraceLayer::new_for_http())
}

/// Minimal host routes used by the binary.
pub fn demo_routes() -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/api/docs", get(docs))
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "welcome to JWT Pizza",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn docs() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [],
    }))
}

/// HTTP server for an instrumented router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(routes: Router, telemetry: Telemetry) -> Self {
        Self {
            router: instrument(routes, telemetry),
        }
    }

    /// Run until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
