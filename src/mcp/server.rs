//! MCP Server
//!
//! Main server loop handling line-delimited JSON-RPC messages over stdio.
//! Stdout carries protocol frames only; diagnostics go through `tracing`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::handlers::ToolHandlers;
use super::protocol::*;
use super::tools::get_tools;
use crate::client::StatXploreClient;

pub const SERVER_NAME: &str = "stat-xplore";

const PREVIEW_CHARS: usize = 100;

/// MCP Server
pub struct McpServer {
    handlers: ToolHandlers,
}

impl McpServer {
    pub fn new(client: StatXploreClient) -> Self {
        Self {
            handlers: ToolHandlers::new(client),
        }
    }

    /// Run the server, reading from stdin and writing to stdout
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve until `reader` reaches end of input.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server started, waiting for messages");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!("<- {}", preview(line));

            let Some(response) = self.handle(line).await else {
                continue;
            };
            let out = serde_json::to_string(&response)?;
            debug!("-> {}", preview(&out));

            writer.write_all(out.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications yield `None`.
    pub async fn handle(&self, msg: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(msg) {
            Ok(v) => v,
            Err(e) => return Some(JsonRpcResponse::error(None, PARSE_ERROR, e.to_string())),
        };
        // Well-formed JSON that is not a request object is an invalid request.
        let req = match JsonRpcRequest::deserialize(&value) {
            Ok(r) => r,
            Err(e) => {
                let id = value.get("id").cloned();
                return Some(JsonRpcResponse::error(id, INVALID_REQUEST, e.to_string()));
            }
        };

        if req.is_notification() {
            debug!(method = %req.method, "notification received");
            return None;
        }

        let id = req.id.clone();
        if req.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", req.jsonrpc),
            ));
        }

        let response = match req.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.into(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo {
                        name: SERVER_NAME.into(),
                        version: env!("CARGO_PKG_VERSION").into(),
                    },
                };
                reply(id, &result)
            }

            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),

            "tools/list" => reply(id, &ToolsListResult { tools: get_tools() }),

            "tools/call" => {
                let params: ToolCallParams = match serde_json::from_value(req.params) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()))
                    }
                };

                info!(tool = %params.name, "calling tool");
                let result = self.handlers.handle(&params.name, params.arguments).await;
                reply(id, &result)
            }

            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {}", req.method),
            ),
        };
        Some(response)
    }
}

fn reply<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse::success(id, v),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {}", e)),
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
