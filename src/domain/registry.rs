//! Operation registry for the Apache management tools
//!
//! A fixed table of descriptors, built once and never mutated. Each entry
//! carries the wire-visible `Tool` schema, the declared parameter table the
//! executor validates against, and the handler backing the operation.

use futures::future::BoxFuture;
use rust_mcp_sdk::schema::{ContentBlock, Tool};
use serde_json::{Map, Value};

use crate::domain::tools;
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Bool,
}

impl ParamKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ParamDefault {
    Bool(bool),
}

impl ParamDefault {
    pub fn to_value(self) -> Value {
        match self {
            Self::Bool(value) => Value::Bool(value),
        }
    }
}

#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<ParamDefault>,
}

impl ParamSpec {
    pub fn matches(&self, value: &Value) -> bool {
        match self.kind {
            ParamKind::String => value.is_string(),
            ParamKind::Bool => value.is_boolean(),
        }
    }
}

pub type ToolHandler = for<'a> fn(
    &'a AppState,
    Map<String, Value>,
) -> BoxFuture<'a, Result<Vec<ContentBlock>, AppError>>;

pub struct ToolDescriptor {
    pub name: &'static str,
    pub tool: fn() -> Tool,
    pub params: &'static [ParamSpec],
    pub handler: ToolHandler,
}

const NO_PARAMS: &[ParamSpec] = &[];

const SITE_NAME_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "site_name",
    kind: ParamKind::String,
    required: true,
    default: None,
}];

const SITE_TOGGLE_PARAMS: &[ParamSpec] = &[
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

// Insertion order is the order clients see from `tools/list`.
static REGISTRY: [ToolDescriptor; 8] = [
    ToolDescriptor {
        name: "list_available_sites",
        tool: tools::ListAvailableSitesTool::tool,
        params: NO_PARAMS,
        handler: tools::list_available_sites,
    },
    ToolDescriptor {
        name: "list_enabled_sites",
        tool: tools::ListEnabledSitesTool::tool,
        params: NO_PARAMS,
        handler: tools::list_enabled_sites,
    },
    ToolDescriptor {
        name: "get_site_status",
        tool: tools::GetSiteStatusTool::tool,
        params: SITE_NAME_PARAMS,
        handler: tools::get_site_status,
    },
    ToolDescriptor {
        name: "enable_site",
        tool: tools::EnableSiteTool::tool,
        params: SITE_TOGGLE_PARAMS,
        handler: tools::enable_site,
    },
    ToolDescriptor {
        name: "disable_site",
        tool: tools::DisableSiteTool::tool,
        params: SITE_TOGGLE_PARAMS,
        handler: tools::disable_site,
    },
    ToolDescriptor {
        name: "test_config",
        tool: tools::TestConfigTool::tool,
        params: NO_PARAMS,
        handler: tools::test_config,
    },
    ToolDescriptor {
        name: "reload_apache",
        tool: tools::ReloadApacheTool::tool,
        params: NO_PARAMS,
        handler: tools::reload_apache,
    },
    ToolDescriptor {
        name: "restart_apache",
        tool: tools::RestartApacheTool::tool,
        params: NO_PARAMS,
        handler: tools::restart_apache,
    },
];

pub fn lookup(name: &str) -> Option<&'static ToolDescriptor> {
    REGISTRY.iter().find(|descriptor| descriptor.name == name)
}

pub fn list() -> &'static [ToolDescriptor] {
    &REGISTRY
}

pub fn list_tools() -> Vec<Tool> {
    REGISTRY.iter().map(|descriptor| (descriptor.tool)()).collect()
}
