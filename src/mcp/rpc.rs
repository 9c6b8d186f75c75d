//! JSON-RPC envelope encoding
//!
//! Maps executor outcomes and internal errors to well-formed JSON-RPC
//! payloads. Encoding never fails: every outcome, including failures, has a
//! wire representation.

use rust_mcp_sdk::schema::{
    CallToolResult, JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult,
    RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::mcp::executor::Outcome;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn outcome_to_json_rpc(id: Option<Value>, outcome: Outcome) -> Value {
    match outcome {
        Outcome::Success(content) => {
            let result = serde_json::to_value(CallToolResult {
                content,
                is_error: None,
                meta: None,
                structured_content: None,
            })
            .expect("tool result serialization");
            json_rpc_result(id, result)
        }
        Outcome::Failure {
            code,
            message,
            data,
        } => json_rpc_error_with_data(id, code, &message, data),
    }
}

pub fn app_error_to_json_rpc(id: Option<Value>, error: AppError) -> Value {
    outcome_to_json_rpc(id, Outcome::from_app_error(error))
}

pub fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i64,
    message: &str,
    data: Option<Value>,
) -> Value {
    let response = JsonrpcErrorResponse::new(
        RpcError {
            code,
            data,
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );
    serde_json::to_value(response).expect("jsonrpc error response serialization")
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}

pub fn request_id_to_value(id: RequestId) -> Value {
    match id {
        RequestId::String(value) => Value::String(value),
        RequestId::Integer(value) => Value::Number(value.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_json_rpc_error, json_rpc_error_with_data, json_rpc_result, outcome_to_json_rpc};
    use crate::mcp::executor::Outcome;
    use serde_json::json;

    #[test]
    fn result_encoding_echoes_integer_id() {
        let encoded = json_rpc_result(Some(json!(42)), json!({ "content": [] }));
        assert_eq!(encoded["jsonrpc"], "2.0");
        assert_eq!(encoded["id"], 42);
        assert!(!is_json_rpc_error(&encoded));
    }

    #[test]
    fn result_encoding_echoes_string_id() {
        let encoded = json_rpc_result(Some(json!("req-7")), json!({ "content": [] }));
        assert_eq!(encoded["id"], "req-7");
    }

    #[test]
    fn error_encoding_carries_code_and_nested_data() {
        let encoded = json_rpc_error_with_data(
            Some(json!(5)),
            -32602,
            "Invalid params",
            Some(json!({ "nested": { "deeply": { "reason": "missing site_name" } } })),
        );
        assert_eq!(encoded["id"], 5);
        assert_eq!(encoded["error"]["code"], -32602);
        assert_eq!(
            encoded["error"]["data"]["nested"]["deeply"]["reason"],
            "missing site_name"
        );
    }

    #[test]
    fn failure_outcome_encodes_as_error_object() {
        let encoded = outcome_to_json_rpc(
            Some(json!(9)),
            Outcome::Failure {
                code: -32603,
                message: "Internal error".to_string(),
                data: None,
            },
        );
        assert!(is_json_rpc_error(&encoded));
        assert_eq!(encoded["error"]["code"], -32603);
        assert_eq!(encoded["id"], 9);
    }
}
