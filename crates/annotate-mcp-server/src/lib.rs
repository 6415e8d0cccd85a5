//! MCP server for screenshot annotation
//!
//! Thin protocol layer over `annotate-core`: tool parameter types, error
//! mapping and result content builders.

pub mod mcp;
pub mod mcp_content;
