//! HTTP transport layer for the Model Context Protocol
//!
//! Two transports share the dispatch core: an SSE event stream with a
//! companion message channel, and a unified streaming endpoint.

pub mod handlers;
pub mod sse;
pub mod stream;
