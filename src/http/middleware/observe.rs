//! Request observation middleware.
//!
//! Wraps the next handler: times the exchange, captures both bodies, then
//! counts the request, queues the endpoint latency metric and hands the
//! exchange to the HTTP logger before returning the response untouched.

use std::time::Instant;

use axum::{
    body::{self, Body},
    extract::{OriginalUri, Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use hyper::body::Body as _;

use crate::aggregator::MetricKind;
use crate::logger::{CapturedBody, HttpExchange};
use crate::telemetry::Telemetry;

/// Endpoint latency, aggregated across all routes.
pub const ENDPOINT_LATENCY_METRIC: &str = "latency_service_endpoint";

const UNREADABLE_REQUEST: &str = "Failed to read request body";
const UNREADABLE_RESPONSE: &str = "Failed to read response body";

pub async fn observe_request(
    State(telemetry): State<Telemetry>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().as_str().to_string();
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let authorized = request.headers().contains_key(AUTHORIZATION);

    let (parts, req_body) = request.into_parts();
    let (request_body, response) = match capture(req_body, telemetry.max_capture_bytes).await {
        Ok((captured, req_body)) => {
            let response = next.run(Request::from_parts(parts, req_body)).await;
            (captured, response)
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %path, "Failed to read request body");
            (
                CapturedBody::Empty,
                (StatusCode::BAD_REQUEST, UNREADABLE_REQUEST).into_response(),
            )
        }
    };

    let (mut parts, res_body) = response.into_parts();
    let (response_body, res_body) = match capture(res_body, telemetry.max_capture_bytes).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::error!(error = %e, path = %path, "Failed to read response body");
            parts.status = StatusCode::INTERNAL_SERVER_ERROR;
            parts.headers.remove(CONTENT_LENGTH);
            parts.headers.insert(
                CONTENT_TYPE,
                axum::http::HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            (
                CapturedBody::Text(UNREADABLE_RESPONSE.to_string()),
                Body::from(UNREADABLE_RESPONSE),
            )
        }
    };

    telemetry.aggregator.record_http_request(&method);
    telemetry.metrics.push(
        ENDPOINT_LATENCY_METRIC,
        start.elapsed().as_millis() as u64,
        MetricKind::Sum,
        "ms",
    );
    telemetry.logger.http(&HttpExchange {
        method,
        path,
        status: parts.status.as_u16(),
        authorized,
        request_body,
        response_body,
    });

    Response::from_parts(parts, res_body)
}

/// Buffer a body for logging and hand back an equivalent one.
///
/// Only bodies with a known size within `limit` are buffered; anything else
/// streams through unchanged and is logged as a placeholder. A body that
/// fails mid-read is gone, so the error goes back to the caller.
async fn capture(body: Body, limit: usize) -> Result<(CapturedBody, Body), axum::Error> {
    let fits = body
        .size_hint()
        .upper()
        .is_some_and(|upper| upper <= limit as u64);
    if !fits {
        return Ok((CapturedBody::NotCaptured, body));
    }

    let bytes = body::to_bytes(body, limit).await?;
    Ok((CapturedBody::from_bytes(&bytes), Body::from(bytes)))
}
