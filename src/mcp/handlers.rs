//! MCP Tool Handlers
//!
//! Implements the actual logic for each MCP tool. Core errors are reported
//! in-band as `isError` results tagged with their kind.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::protocol::ToolCallResult;
use crate::client::StatXploreClient;
use crate::error::StatXploreError;
use crate::query::SimpleTableQuery;
use crate::schema::DatasetReference;

/// Failures a tool call can report
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Core(#[from] StatXploreError),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::Core(e) => e.kind(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatabaseSchemaArgs {
    database_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct BrowseSchemaArgs {
    #[serde(default)]
    path: Option<String>,
}

/// `list_databases` result
#[derive(Debug, Serialize)]
struct DatabaseList {
    count: usize,
    databases: Vec<DatasetReference>,
}

/// Tool handlers with the shared client
pub struct ToolHandlers {
    client: StatXploreClient,
}

impl ToolHandlers {
    pub fn new(client: StatXploreClient) -> Self {
        Self { client }
    }

    /// Handle a tool call
    pub async fn handle(&self, name: &str, args: Value) -> ToolCallResult {
        match self.dispatch(name, args).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = name, kind = e.kind(), "tool call failed: {}", e);
                ToolCallResult::failure(e.kind(), &e)
            }
        }
    }

    async fn dispatch(&self, name: &str, args: Value) -> Result<ToolCallResult, ToolError> {
        debug!(tool = name, "dispatching tool call");
        match name {
            "list_databases" => self.list_databases().await,
            "get_database_schema" => self.get_database_schema(parse_args(args)?).await,
            "query_table" => self.query_table(parse_args(args)?).await,
            "get_rate_limit" => self.get_rate_limit().await,
            "browse_schema" => self.browse_schema(parse_args(args)?).await,
            "get_api_info" => Ok(ToolCallResult::json(&self.client.get_info().await?)),
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    async fn list_databases(&self) -> Result<ToolCallResult, ToolError> {
        let databases = self.client.list_datasets().await?;
        Ok(ToolCallResult::json(&DatabaseList {
            count: databases.len(),
            databases,
        }))
    }

    async fn get_database_schema(
        &self,
        args: DatabaseSchemaArgs,
    ) -> Result<ToolCallResult, ToolError> {
        let node = self.client.get_dataset_detail(&args.database_id).await?;
        Ok(ToolCallResult::json(&node))
    }

    async fn query_table(&self, query: SimpleTableQuery) -> Result<ToolCallResult, ToolError> {
        let result = self.client.query_simple(&query).await?;
        Ok(ToolCallResult::json(&result))
    }

    async fn get_rate_limit(&self) -> Result<ToolCallResult, ToolError> {
        let info = self.client.get_rate_limit().await?;
        Ok(ToolCallResult::json(&info))
    }

    async fn browse_schema(&self, args: BrowseSchemaArgs) -> Result<ToolCallResult, ToolError> {
        let path = args.path.as_deref().filter(|p| !p.is_empty());
        let node = self.client.get_schema(path).await?;
        Ok(ToolCallResult::json(&node))
    }
}

/// Omitted arguments are read as an empty object.
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_arguments_read_as_empty() {
        let args: BrowseSchemaArgs = parse_args(Value::Null).unwrap();
        assert!(args.path.is_none());
    }

    #[test]
    fn missing_required_argument_is_invalid() {
        let err = parse_args::<DatabaseSchemaArgs>(json!({})).unwrap_err();
        assert_eq!(err.kind(), "invalid_arguments");
    }

    #[test]
    fn query_arguments_parse_into_simple_query() {
        let query: SimpleTableQuery = parse_args(json!({
            "database": "str:database:UC_Monthly",
            "measures": ["str:count:UC_Monthly:V_F_UC_CASELOAD_FULL"],
            "row_fields": ["str:field:UC_Monthly:F_UC_DATE:DATE_NAME"],
            "filters": {"str:field:UC_Monthly:V_F_UC_CASELOAD_FULL:PARLC": ["a", "b"]}
        }))
        .unwrap();
        assert!(query.column_fields.is_none());
        assert_eq!(query.filters.unwrap().len(), 1);
    }

    #[test]
    fn core_errors_keep_their_kind() {
        let err: ToolError = StatXploreError::InvalidQuery("no measures".into()).into();
        assert_eq!(err.kind(), "invalid_query");
        assert_eq!(err.to_string(), StatXploreError::InvalidQuery("no measures".into()).to_string());
    }
}
