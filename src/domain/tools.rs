//! Apache management operations exposed via Model Context Protocol
//!
//! Each handler delegates to the `SiteProvider` collaborator and reports the
//! outcome as readable text. Command failures are part of that text, never
//! protocol errors.

use futures::future::BoxFuture;
use rust_mcp_sdk::{
    macros,
    schema::{ContentBlock, TextContent},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::utils::{normalize_site_name, site_exists, status_banner};
use crate::errors::AppError;
use crate::site_store::SiteCommand;
use crate::AppState;

pub type ToolOutput = Result<Vec<ContentBlock>, AppError>;

#[macros::mcp_tool(
    name = "list_available_sites",
    description = "List all available Apache site configurations in /etc/apache2/sites-available"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListAvailableSitesTool {}

#[macros::mcp_tool(
    name = "list_enabled_sites",
    description = "List all enabled Apache site configurations in /etc/apache2/sites-enabled"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListEnabledSitesTool {}

#[macros::mcp_tool(
    name = "get_site_status",
    description = "Get detailed status of a specific Apache site configuration"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetSiteStatusTool {
    pub site_name: String,
}

#[macros::mcp_tool(
    name = "enable_site",
    description = "Enable an Apache site configuration using a2ensite"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct EnableSiteTool {
    pub site_name: String,
    pub reload: Option<bool>,
}

#[macros::mcp_tool(
    name = "disable_site",
    description = "Disable an Apache site configuration using a2dissite"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DisableSiteTool {
    pub site_name: String,
    pub reload: Option<bool>,
}

#[macros::mcp_tool(
    name = "test_config",
    description = "Test Apache configuration for syntax errors using 'apache2ctl configtest'"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct TestConfigTool {}

#[macros::mcp_tool(
    name = "reload_apache",
    description = "Reload Apache configuration without dropping connections"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ReloadApacheTool {}

#[macros::mcp_tool(
    name = "restart_apache",
    description = "Restart Apache web server (drops all connections)"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct RestartApacheTool {}

fn text_block(text: impl Into<String>) -> ContentBlock {
    ContentBlock::from(TextContent::new(text.into(), None, None))
}

fn required_site_name(arguments: &Map<String, Value>) -> Result<String, AppError> {
    let raw = arguments
        .get("site_name")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::bad_request("missing_argument", "site_name is required"))?;
    normalize_site_name(raw)
}

fn reload_requested(arguments: &Map<String, Value>) -> bool {
    arguments
        .get("reload")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

pub fn list_available_sites(state: &AppState, _arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let sites = state.site_provider.list_available_sites().await?;
        if sites.is_empty() {
            return Ok(vec![text_block(format!(
                "No available sites found in {}",
                state.site_provider.available_dir()
            ))]);
        }

        let mut result = String::from("Available Apache Sites:\n\n");
        for site in &sites {
            let status = if state.site_provider.is_site_enabled(site).await {
                "✓ ENABLED"
            } else {
                "✗ disabled"
            };
            result.push_str(&format!("  {status} - {site}\n"));
        }

        Ok(vec![text_block(result)])
    })
}

pub fn list_enabled_sites(state: &AppState, _arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let sites = state.site_provider.list_enabled_sites().await?;
        if sites.is_empty() {
            return Ok(vec![text_block(format!(
                "No enabled sites found in {}",
                state.site_provider.enabled_dir()
            ))]);
        }

        let mut result = String::from("Enabled Apache Sites:\n\n");
        for site in &sites {
            result.push_str(&format!("  ✓ {site}\n"));
        }

        Ok(vec![text_block(result)])
    })
}

pub fn get_site_status(state: &AppState, arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let site_name = required_site_name(&arguments)?;

        let available = state.site_provider.list_available_sites().await?;
        if !available.contains(&site_name) {
            return Ok(vec![text_block(format!(
                "Error: Site '{site_name}' not found in sites-available"
            ))]);
        }

        let enabled = state.site_provider.is_site_enabled(&site_name).await;
        let config = state
            .site_provider
            .site_config(&site_name)
            .await?
            .unwrap_or_default();

        let mut result = format!(
            "Site: {site_name}\nStatus: {}\nAvailable: Yes\nConfig Path: {}/{site_name}\n",
            status_banner(enabled),
            state.site_provider.available_dir()
        );
        if enabled {
            result.push_str(&format!(
                "Enabled Path: {}/{site_name}\n",
                state.site_provider.enabled_dir()
            ));
        }
        result.push_str(&format!("\nConfiguration:\n{}\n{config}\n", "=".repeat(60)));

        Ok(vec![text_block(result)])
    })
}

pub fn enable_site(state: &AppState, arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let site_name = required_site_name(&arguments)?;
        let reload = reload_requested(&arguments);

        let available = state.site_provider.list_available_sites().await?;
        if !site_exists(&available, &site_name) {
            return Ok(vec![text_block(format!(
                "Error: Site '{site_name}' not found in sites-available"
            ))]);
        }

        if state.site_provider.is_site_enabled(&site_name).await {
            return Ok(vec![text_block(format!(
                "Site '{site_name}' is already enabled"
            ))]);
        }

        let output = state
            .site_provider
            .run_site_command(SiteCommand::EnableSite(site_name.clone()))
            .await;
        if !output.success {
            return Ok(vec![text_block(format!(
                "Error enabling site:\n{}",
                output.stderr
            ))]);
        }

        let mut result = format!("Successfully enabled site: {site_name}\n{}\n", output.stdout);
        result.push_str(&reload_suffix(state, reload).await);

        Ok(vec![text_block(result)])
    })
}

pub fn disable_site(state: &AppState, arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let site_name = required_site_name(&arguments)?;
        let reload = reload_requested(&arguments);

        if !state.site_provider.is_site_enabled(&site_name).await {
            return Ok(vec![text_block(format!(
                "Site '{site_name}' is not enabled"
            ))]);
        }

        let output = state
            .site_provider
            .run_site_command(SiteCommand::DisableSite(site_name.clone()))
            .await;
        if !output.success {
            return Ok(vec![text_block(format!(
                "Error disabling site:\n{}",
                output.stderr
            ))]);
        }

        let mut result = format!("Successfully disabled site: {site_name}\n{}\n", output.stdout);
        result.push_str(&reload_suffix(state, reload).await);

        Ok(vec![text_block(result)])
    })
}

async fn reload_suffix(state: &AppState, reload: bool) -> String {
    if !reload {
        return "\nNote: Apache not reloaded. Run 'reload_apache' to apply changes.".to_string();
    }

    let output = state
        .site_provider
        .run_site_command(SiteCommand::ReloadServer)
        .await;
    if output.success {
        "\nApache configuration reloaded successfully".to_string()
    } else {
        format!("\nWarning: Failed to reload Apache:\n{}", output.stderr)
    }
}

pub fn test_config(state: &AppState, _arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let output = state
            .site_provider
            .run_site_command(SiteCommand::ConfigTest)
            .await;

        let mut result = String::from("Apache Configuration Test:\n\n");
        result.push_str(if output.success {
            "✓ Syntax OK\n"
        } else {
            "✗ Configuration Error\n"
        });
        if !output.stdout.is_empty() {
            result.push_str(&format!("\nOutput:\n{}", output.stdout));
        }
        if !output.stderr.is_empty() {
            result.push_str(&format!("\nErrors:\n{}", output.stderr));
        }

        Ok(vec![text_block(result)])
    })
}

pub fn reload_apache(state: &AppState, _arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let output = state
            .site_provider
            .run_site_command(SiteCommand::ReloadServer)
            .await;

        let result = if output.success {
            "✓ Apache reloaded successfully".to_string()
        } else {
            format!("✗ Failed to reload Apache:\n{}", output.stderr)
        };

        Ok(vec![text_block(result)])
    })
}

pub fn restart_apache(state: &AppState, _arguments: Map<String, Value>) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        let output = state
            .site_provider
            .run_site_command(SiteCommand::RestartServer)
            .await;

        let result = if output.success {
            "✓ Apache restarted successfully".to_string()
        } else {
            format!("✗ Failed to restart Apache:\n{}", output.stderr)
        };

        Ok(vec![text_block(result)])
    })
}

#[cfg(test)]
mod tests {
    use super::{reload_requested, required_site_name};
    use serde_json::{json, Map, Value};

    fn arguments(value: Value) -> Map<String, Value> {
        value.as_object().expect("object arguments").clone()
    }

    #[test]
    fn site_name_is_normalized() {
        let args = arguments(json!({ "site_name": " blog.conf " }));
        let name = required_site_name(&args).expect("valid site name");
        assert_eq!(name, "blog.conf");
    }

    #[test]
    fn missing_site_name_is_rejected() {
        let args = arguments(json!({}));
        let error = required_site_name(&args).expect_err("expected missing argument");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn reload_defaults_to_true() {
        assert!(reload_requested(&arguments(json!({}))));
        assert!(!reload_requested(&arguments(json!({ "reload": false }))));
    }
}
