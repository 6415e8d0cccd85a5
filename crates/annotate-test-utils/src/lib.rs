//! Test utilities for annotate-mcp integration tests
//!
//! Shared fixtures for the workspace's integration tests: synthetic source
//! images written to temporary directories, sample annotation lists, and
//! simple timing assertions.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! annotate-test-utils = { path = "../annotate-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`fixtures`]: source images and sample annotation JSON
//! - [`timing`]: duration measurement and threshold assertions
//!
//! # MCP Server Testing
//!
//! Protocol-level helpers live in `annotate-mcp-server/tests/common/`
//! because they depend on the server crate itself.

pub mod fixtures;
pub mod timing;
