//! Unified streaming transport, server-push side
//!
//! `GET /message` streams newline-delimited JSON: one `endpoint` notification
//! naming the companion request URI, then a keep-alive ping every second.
//! The ticker lives inside the response body stream, so a client disconnect
//! drops the stream and cancels the loop at its await point.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use futures::{stream, StreamExt};
use serde_json::json;
use tokio::time::{interval_at, Instant};
use tokio_stream::wrappers::IntervalStream;

pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(1);

const KEEP_ALIVE_LINE: &[u8] = b"{\"jsonrpc\":\"2.0\",\"method\":\"ping\"}\n";

pub async fn message_stream(headers: HeaderMap) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let endpoint = json!({
        "jsonrpc": "2.0",
        "method": "endpoint",
        "params": {
            "uri": format!("http://{host}/"),
        },
    });

    let first = stream::once(std::future::ready(Bytes::from(format!("{endpoint}\n"))));
    // first keep-alive fires one full interval after connect
    let ticker = interval_at(Instant::now() + KEEP_ALIVE_INTERVAL, KEEP_ALIVE_INTERVAL);
    let keep_alives = IntervalStream::new(ticker).map(|_| Bytes::from_static(KEEP_ALIVE_LINE));

    let body = Body::from_stream(first.chain(keep_alives).map(Ok::<_, Infallible>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CACHE_CONTROL, "no-cache")
        .header("x-accel-buffering", "no")
        .body(body)
        .expect("stream response build")
}
