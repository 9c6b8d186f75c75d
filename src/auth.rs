use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{errors::AppError, AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let Some(provided) = provided else {
        return Err(AppError::unauthorized("Missing X-API-Key header"));
    };

    if provided != state.api_key.as_ref() {
        return Err(AppError::forbidden("Invalid API key"));
    }

    Ok(next.run(request).await)
}
