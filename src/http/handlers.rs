//! Axum HTTP handlers for the request/response side
//!
//! Provides the unified streaming transport's POST endpoint and the public
//! metadata endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "authentication": "enabled",
        "transports": ["sse", "http-streaming"],
    }))
}

pub async fn server_info() -> Json<Value> {
    Json(json!({
        "name": "Apache Management MCP Server",
        "version": env!("CARGO_PKG_VERSION"),
        "transports": {
            "sse": {
                "endpoints": {
                    "sse": "/sse (GET)",
                    "messages": "/messages (POST)",
                },
                "description": "Server-Sent Events transport",
            },
            "http-streaming": {
                "endpoint": "/message (GET + POST)",
                "description": "HTTP streaming transport",
            },
        },
        "authentication": {
            "enabled": true,
            "method": "API Key",
            "header": "X-API-Key",
        },
    }))
}

/// POST side of the unified streaming transport: one envelope (or batch) per
/// request, processed to completion, response returned in the HTTP body.
pub async fn message_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::OK,
                Json(json_rpc_error(None, -32700, "Parse error")),
            )
                .into_response()
        }
    };

    if let Some(batch) = payload.as_array() {
        if batch.is_empty() {
            return (
                StatusCode::OK,
                Json(vec![json_rpc_error(None, -32600, "Invalid Request")]),
            )
                .into_response();
        }

        let mut responses = Vec::new();
        for item in batch {
            if let Some(response) = handle_json_rpc_value(&state, item.clone()).await {
                responses.push(response);
            }
        }

        if responses.is_empty() {
            return StatusCode::NO_CONTENT.into_response();
        }

        return (StatusCode::OK, Json(Value::Array(responses))).into_response();
    }

    match handle_json_rpc_value(&state, payload).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
