//! Stat-Xplore client
//!
//! Shared entry point for both shells. Owns the transport handle; each method
//! call works on data it owns exclusively and nothing is cached between calls.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Result, StatXploreError};
use crate::query::{normalize_body, QueryResult, SimpleTableQuery, TableQuerySpec};
use crate::rate_limit::RateLimitInfo;
use crate::schema::{DatasetReference, ExplorerOptions, SchemaExplorer, SchemaNode};
use crate::transport::{HttpTransport, Transport};

#[derive(Clone)]
pub struct StatXploreClient {
    transport: Arc<dyn Transport>,
    explorer_options: ExplorerOptions,
}

impl StatXploreClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            explorer_options: ExplorerOptions::default(),
        }
    }

    /// Client over HTTP, configured from `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = HttpTransport::new(settings)?;
        Ok(Self::new(Arc::new(transport)).with_explorer_options(ExplorerOptions {
            max_depth: settings.max_depth,
        }))
    }

    pub fn with_explorer_options(mut self, options: ExplorerOptions) -> Self {
        self.explorer_options = options;
        self
    }

    pub fn explorer(&self) -> SchemaExplorer<'_> {
        SchemaExplorer::with_options(self.transport.as_ref(), self.explorer_options.clone())
    }

    /// Schema node by id; `None` for the root.
    pub async fn get_schema(&self, id: Option<&str>) -> Result<SchemaNode> {
        self.explorer().fetch_node(id).await
    }

    pub async fn list_datasets(&self) -> Result<Vec<DatasetReference>> {
        self.explorer().list_datasets().await
    }

    pub async fn get_dataset_detail(&self, dataset_id: &str) -> Result<SchemaNode> {
        self.explorer().get_dataset_detail(dataset_id).await
    }

    /// Run a native table query.
    pub async fn execute_query(&self, spec: &TableQuerySpec) -> Result<QueryResult> {
        spec.validate()?;
        let body = spec.to_wire()?;
        debug!(
            database = %spec.database,
            rows = spec.row_fields().len(),
            columns = spec.column_fields().map_or(0, <[String]>::len),
            "executing table query"
        );

        let response = self.transport.post_json("/table", &body).await?;
        if !response.is_success() {
            warn!(status = response.status, "table query rejected by provider");
            return Err(StatXploreError::QueryExecution {
                status: response.status,
                body: response.body,
            });
        }
        normalize_body(&response.body)
    }

    /// Build and run a simplified query.
    pub async fn query_simple(&self, query: &SimpleTableQuery) -> Result<QueryResult> {
        let spec = query.build()?;
        self.execute_query(&spec).await
    }

    /// Current quota. Rate-limit headers win when present and well-formed,
    /// otherwise the body is read.
    pub async fn get_rate_limit(&self) -> Result<RateLimitInfo> {
        let response = self.transport.get("/rate_limit").await?.error_for_status()?;

        if RateLimitInfo::headers_present(&response.headers) {
            match RateLimitInfo::from_headers(&response.headers) {
                Some(info) => return Ok(info),
                None => debug!("rate-limit headers unparseable, reading body"),
            }
        }

        let body = response.json().unwrap_or(Value::Null);
        Ok(RateLimitInfo::from_body(&body))
    }

    /// API instance information, passed through as-is.
    pub async fn get_info(&self) -> Result<Value> {
        let response = self.transport.get("/info").await?.error_for_status()?;
        response
            .json()
            .map_err(|e| StatXploreError::ResultParse(format!("info body is not JSON: {}", e)))
    }
}
