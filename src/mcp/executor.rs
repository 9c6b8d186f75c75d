//! Call executor
//!
//! Resolves an operation name against the registry, validates and normalizes
//! arguments against the declared parameter table, invokes the handler, and
//! wraps every path into an `Outcome`. No fault crosses this boundary
//! unconverted.

use rust_mcp_sdk::schema::ContentBlock;
use serde_json::{json, Map, Value};

use crate::domain::registry::{self, ParamSpec};
use crate::errors::AppError;
use crate::AppState;

/// The single result value of one executed call. Built exactly once and
/// handed to the codec for encoding.
#[derive(Debug)]
pub enum Outcome {
    Success(Vec<ContentBlock>),
    Failure {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl Outcome {
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::BadRequest { code, message } => Self::Failure {
                code: -32602,
                message: "Invalid params".to_string(),
                data: Some(json!({
                    "code": code,
                    "message": message,
                    "details": {}
                })),
            },
            AppError::Unauthorized { .. } | AppError::Forbidden { .. } => Self::Failure {
                code: -32001,
                message: "Unauthorized".to_string(),
                data: None,
            },
            AppError::NoActiveSession | AppError::Internal { .. } => Self::Failure {
                code: -32603,
                message: "Internal error".to_string(),
                data: None,
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

pub async fn execute(
    state: &AppState,
    name: &str,
    arguments: Option<Map<String, Value>>,
) -> Outcome {
    let Some(descriptor) = registry::lookup(name) else {
        return Outcome::Failure {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": name,
                },
            })),
        };
    };

    let arguments = match normalize_arguments(descriptor.params, arguments.unwrap_or_default()) {
        Ok(arguments) => arguments,
        Err(error) => return Outcome::from_app_error(error),
    };

    match (descriptor.handler)(state, arguments).await {
        Ok(content) => Outcome::Success(content),
        Err(error) => Outcome::from_app_error(error),
    }
}

/// Checks presence and type of each declared parameter and fills in declared
/// defaults. Explicit `null` counts as absent. Undeclared keys pass through
/// untouched.
pub fn normalize_arguments(
    params: &[ParamSpec],
    mut arguments: Map<String, Value>,
) -> Result<Map<String, Value>, AppError> {
    for param in params {
        let present = match arguments.get(param.name) {
            None | Some(Value::Null) => false,
            Some(value) => {
                if !param.matches(value) {
                    return Err(AppError::bad_request(
                        "invalid_argument",
                        format!("{} must be a {}", param.name, param.kind.label()),
                    ));
                }
                true
            }
        };

        if !present {
            if param.required {
                return Err(AppError::bad_request(
                    "missing_argument",
                    format!("{} is required", param.name),
                ));
            }
            match param.default {
                Some(default) => {
                    arguments.insert(param.name.to_string(), default.to_value());
                }
                None => {
                    arguments.remove(param.name);
                }
            }
        }
    }

    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{execute, normalize_arguments, Outcome};
    use crate::domain::registry::{ParamDefault, ParamKind, ParamSpec};
    use crate::errors::AppError;
    use crate::site_store::{CommandOutput, SiteCommand, SiteProvider};
    use crate::AppState;
    use serde_json::{json, Map, Value};

    const TOGGLE_PARAMS: &[ParamSpec] = &[
        ParamSpec {
            name: "site_name",
            kind: ParamKind::String,
            required: true,
            default: None,
        },
        ParamSpec {
            name: "reload",
            kind: ParamKind::Bool,
            required: false,
            default: Some(ParamDefault::Bool(true)),
        },
    ];

    fn arguments(value: Value) -> Map<String, Value> {
        value.as_object().expect("object arguments").clone()
    }

    struct StaticProvider;

    #[async_trait::async_trait]
    impl SiteProvider for StaticProvider {
        async fn list_available_sites(&self) -> Result<Vec<String>, AppError> {
            Ok(vec!["blog.conf".to_string()])
        }

        async fn list_enabled_sites(&self) -> Result<Vec<String>, AppError> {
            Ok(vec![])
        }

        async fn is_site_enabled(&self, _site: &str) -> bool {
            false
        }

        async fn site_config(&self, _site: &str) -> Result<Option<String>, AppError> {
            Ok(None)
        }

        async fn run_site_command(&self, _command: SiteCommand) -> CommandOutput {
            CommandOutput {
                success: true,
                stdout: "Enabling site blog".to_string(),
                stderr: String::new(),
            }
        }

        fn available_dir(&self) -> String {
            "/etc/apache2/sites-available".to_string()
        }

        fn enabled_dir(&self) -> String {
            "/etc/apache2/sites-enabled".to_string()
        }
    }

    fn state() -> AppState {
        AppState::new("test-key".to_string(), Arc::new(StaticProvider))
    }

    #[tokio::test]
    async fn unknown_operation_yields_method_not_found() {
        let outcome = execute(&state(), "nonexistent-op", Some(Map::new())).await;
        match outcome {
            Outcome::Failure { code, data, .. } => {
                assert_eq!(code, -32601);
                assert_eq!(data.expect("data")["code"], "tool_not_found");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn valid_call_yields_success_content() {
        let outcome = execute(
            &state(),
            "enable_site",
            Some(arguments(json!({ "site_name": "blog.conf" }))),
        )
        .await;
        assert!(!outcome.is_failure());
    }

    #[tokio::test]
    async fn missing_required_argument_yields_invalid_params() {
        let outcome = execute(&state(), "enable_site", Some(Map::new())).await;
        match outcome {
            Outcome::Failure { code, data, .. } => {
                assert_eq!(code, -32602);
                assert_eq!(data.expect("data")["code"], "missing_argument");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn normalize_applies_declared_default() {
        let normalized = normalize_arguments(
            TOGGLE_PARAMS,
            arguments(json!({ "site_name": "blog.conf" })),
        )
        .expect("valid arguments");
        assert_eq!(normalized["reload"], json!(true));
    }

    #[test]
    fn normalize_rejects_type_mismatch() {
        let error = normalize_arguments(
            TOGGLE_PARAMS,
            arguments(json!({ "site_name": "blog.conf", "reload": "yes" })),
        )
        .expect_err("expected type mismatch");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn normalize_treats_null_as_absent() {
        let normalized = normalize_arguments(
            TOGGLE_PARAMS,
            arguments(json!({ "site_name": "blog.conf", "reload": null })),
        )
        .expect("valid arguments");
        assert_eq!(normalized["reload"], json!(true));

        let error = normalize_arguments(
            TOGGLE_PARAMS,
            arguments(json!({ "site_name": null })),
        )
        .expect_err("expected missing argument");
        assert!(error.to_string().contains("bad request"));
    }
}
