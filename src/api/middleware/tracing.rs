//! Request spans for every route.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub type HttpTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>>;

/// One `INFO` span per request (method, URI, version) and a completion event
/// with status and latency in milliseconds. Headers are never recorded:
/// redirect requests carry visitor IPs and user agents.
///
/// ```text
/// INFO request{method=POST uri=/api/links version=HTTP/1.1}: finished processing request latency=4 ms status=201
/// ```
pub fn layer() -> HttpTraceLayer {
    let span = DefaultMakeSpan::new()
        .level(Level::INFO)
        .include_headers(false);
    let finished = DefaultOnResponse::new()
        .level(Level::INFO)
        .latency_unit(LatencyUnit::Millis);

    TraceLayer::new_for_http()
        .make_span_with(span)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(finished)
}
