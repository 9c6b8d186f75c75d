use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod site_store;

use http::sse::SseSessions;
use site_store::SiteProvider;

#[derive(Clone)]
pub struct AppState {
    pub api_key: Arc<str>,
    pub site_provider: Arc<dyn SiteProvider>,
    pub sse_sessions: Arc<SseSessions>,
}

impl AppState {
    pub fn new(api_key: String, site_provider: Arc<dyn SiteProvider>) -> Self {
        Self {
            api_key: Arc::<str>::from(api_key),
            site_provider,
            sse_sessions: Arc::new(SseSessions::default()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/sse", get(http::sse::sse_connect))
        .route("/messages", post(http::sse::sse_messages))
        .route(
            "/message",
            get(http::stream::message_stream).post(http::handlers::message_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/", get(http::handlers::server_info))
        .merge(protected)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
