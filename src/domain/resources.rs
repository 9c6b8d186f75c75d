//! Resource catalog for Apache site configurations
//!
//! Every available site is exposed as a read-only `apache://` resource. The
//! catalog holds no state: listings and reads go to the site store at call
//! time, so consecutive calls reflect the live directory contents.

use rust_mcp_sdk::schema::{
    ListResourcesResult, ReadResourceContent, ReadResourceRequestParams, ReadResourceResult,
    Resource, TextResourceContents,
};
use serde_json::{json, Value};

use crate::domain::utils::{status_banner, status_label};
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};
use crate::AppState;

pub const SITE_URI_PREFIX: &str = "apache://sites-available/";

pub async fn handle_resources_list(state: &AppState, id: Option<Value>) -> Value {
    let sites = match state.site_provider.list_available_sites().await {
        Ok(sites) => sites,
        Err(error) => return app_error_to_json_rpc(id, error),
    };

    let mut resources = Vec::with_capacity(sites.len());
    for site in sites {
        let status = status_label(state.site_provider.is_site_enabled(&site).await);
        resources.push(Resource {
            annotations: None,
            description: Some(format!("Apache site configuration - {status}")),
            icons: vec![],
            meta: None,
            mime_type: Some("text/plain".to_string()),
            name: format!("{site} ({status})"),
            size: None,
            title: None,
            uri: format!("{SITE_URI_PREFIX}{site}"),
        });
    }

    json_rpc_result(
        id,
        serde_json::to_value(ListResourcesResult {
            meta: None,
            next_cursor: None,
            resources,
        })
        .expect("resources list result serialization"),
    )
}

pub async fn handle_resources_read(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    // Unrecognized prefixes are rejected before the store is consulted.
    let Some(site_name) = resource_read.uri.strip_prefix(SITE_URI_PREFIX) else {
        return resource_not_found(id, &resource_read.uri);
    };

    match state.site_provider.site_config(site_name).await {
        // An existing but empty file is readable content; only a missing
        // file is treated as not found.
        Ok(Some(config)) => {
            let enabled = state.site_provider.is_site_enabled(site_name).await;
            let text = format!(
                "# Apache Site: {site_name}\n# Status: {}\n\n{config}",
                status_banner(enabled)
            );
            let result = serde_json::to_value(ReadResourceResult {
                contents: vec![ReadResourceContent::from(TextResourceContents {
                    meta: None,
                    mime_type: Some("text/plain".to_string()),
                    text,
                    uri: resource_read.uri.clone(),
                })],
                meta: None,
            })
            .expect("read site result serialization");

            json_rpc_result(id, result)
        }
        Ok(None) => resource_not_found(id, &resource_read.uri),
        Err(error) => app_error_to_json_rpc(id, error),
    }
}

fn resource_not_found(id: Option<Value>, uri: &str) -> Value {
    json_rpc_error_with_data(
        id,
        -32602,
        "Invalid params",
        Some(json!({
            "code": "resource_not_found",
            "message": "unknown resource uri",
            "details": {
                "uri": uri,
            },
        })),
    )
}
