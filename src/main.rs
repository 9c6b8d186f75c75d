use std::sync::Arc;

use apache_manager_mcp::{
    build_app, config::Config, logging, site_store::ApacheSiteClient, AppState,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    if config.api_key_generated {
        warn!(
            api_key = %config.api_key,
            "MCP_API_KEY not set; generated a key for this run"
        );
    }
    if tokio::fs::metadata(&config.sites_available).await.is_err() {
        warn!(
            directory = %config.sites_available,
            "sites-available directory not found; listings will be empty"
        );
    }

    let provider = Arc::new(ApacheSiteClient::new(
        config.sites_available.as_str(),
        config.sites_enabled.as_str(),
    ));
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config.api_key.clone(), provider);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "apache manager mcp server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
