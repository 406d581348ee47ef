//! MCP Tool Definitions
//!
//! Defines all available tools for the Stat-Xplore MCP server.

use super::protocol::Tool;
use serde_json::json;

/// Get all available MCP tools
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "list_databases".into(),
            description: "List all available Stat-Xplore databases (benefits datasets)".into(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: "get_database_schema".into(),
            description: "Get database schema with available fields and measures".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_id": {
                        "type": "string",
                        "description": "Database ID (e.g., 'str:database:UC_Monthly' or 'UC_Monthly')"
                    }
                },
                "required": ["database_id"]
            }),
        },
        Tool {
            name: "query_table".into(),
            description: "Query a Stat-Xplore table to get benefit statistics data".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database": {
                        "type": "string",
                        "description": "Database ID (e.g., 'str:database:UC_Monthly')"
                    },
                    "measures": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of measure IDs to retrieve"
                    },
                    "row_fields": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Field IDs for row dimension"
                    },
                    "column_fields": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional field IDs for column dimension"
                    },
                    "filters": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "array",
                            "items": {"type": "string"}
                        },
                        "description": "Filters: field ID -> list of value IDs"
                    }
                },
                "required": ["database", "measures", "row_fields"]
            }),
        },
        Tool {
            name: "get_rate_limit".into(),
            description: "Check current API rate limit status".into(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: "browse_schema".into(),
            description: "Browse the schema hierarchy starting from a path".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Schema path to browse (leave empty for root)"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_api_info".into(),
            description: "Get information about the Stat-Xplore API instance".into(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}
