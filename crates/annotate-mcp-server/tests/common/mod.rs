//! Shared test utilities for MCP integration tests

pub mod mcp_harness;
