use std::{env, net::SocketAddr};

use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_SITES_AVAILABLE: &str = "/etc/apache2/sites-available";
pub const DEFAULT_SITES_ENABLED: &str = "/etc/apache2/sites-enabled";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_key_generated: bool,
    pub bind_addr: String,
    pub bind_port: u16,
    pub sites_available: String,
    pub sites_enabled: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let configured_key = env::var("MCP_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let api_key_generated = configured_key.is_none();
        let api_key = configured_key.unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8000);
        let sites_available = env::var("SITES_AVAILABLE_DIR")
            .unwrap_or_else(|_| DEFAULT_SITES_AVAILABLE.to_string());
        let sites_enabled =
            env::var("SITES_ENABLED_DIR").unwrap_or_else(|_| DEFAULT_SITES_ENABLED.to_string());

        let config = Self {
            api_key,
            api_key_generated,
            bind_addr,
            bind_port,
            sites_available,
            sites_enabled,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
