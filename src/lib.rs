//! Tasker MCP Server library.
//!
//! Provides the [`server::TaskerMcpServer`] MCP server handler, the phone
//! HTTP client, wake-on-LAN support, and configuration types. Used by the
//! `tasker-mcp` binary and available for integration testing.

pub mod client;
pub mod config;
pub mod server;
pub mod tools;
pub mod wol;
