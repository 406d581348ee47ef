//! MCP (Model Context Protocol) server for Stat-Xplore
//!
//! Exposes dataset discovery, schema browsing, table queries and quota
//! checks as tools over stdio JSON-RPC.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use handlers::{ToolError, ToolHandlers};
pub use server::McpServer;
pub use tools::get_tools;
