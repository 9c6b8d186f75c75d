//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides protocol-level specifics surrounding JSON-RPC validation, call
//! execution, formatting, and routing.

pub mod executor;
pub mod rpc;
pub mod server;
