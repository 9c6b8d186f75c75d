use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {message}")]
    Unauthorized { message: &'static str },
    #[error("forbidden: {message}")]
    Forbidden { message: &'static str },
    #[error("bad request: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("no active session")]
    NoActiveSession,
    #[error("internal error")]
    Internal { message: String },
}

impl AppError {
    pub fn unauthorized(message: &'static str) -> Self {
        Self::Unauthorized { message }
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::Forbidden { message }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Authentication required",
                    "message": message,
                }),
            ),
            Self::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                json!({
                    "error": "Authentication failed",
                    "message": message,
                }),
            ),
            Self::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            Self::NoActiveSession => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No SSE connection established" }),
            ),
            Self::Internal { message } => {
                tracing::error!(error = %message, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
