//! REST endpoints
//!
//! GET  /                  : service metadata
//! GET  /health            : liveness
//! GET  /databases         : every dataset in the schema tree
//! GET  /schema            : root schema node
//! GET  /schema/*id        : schema node by id
//! GET  /database/*id      : dataset detail (bare or `str:database:` ids)
//! POST /table             : native table query
//! POST /table/simple      : simplified rows/columns/filters query
//! GET  /rate_limit        : current quota
//! GET  /info              : provider instance information

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use serde_json::{json, Value};

use super::error::AppError;
use super::AppState;
use crate::query::{QueryResult, SimpleTableQuery, TableQuerySpec};
use crate::rate_limit::RateLimitInfo;
use crate::schema::{DatasetReference, SchemaNode};

pub const SERVICE_NAME: &str = "Stat-Xplore API";

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /databases",
            "GET /schema",
            "GET /schema/{id}",
            "GET /database/{id}",
            "POST /table",
            "POST /table/simple",
            "GET /rate_limit",
            "GET /info"
        ]
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /databases
pub async fn list_databases(
    State(state): State<AppState>,
) -> Result<Json<Vec<DatasetReference>>, AppError> {
    let datasets = state.client.list_datasets().await?;
    Ok(Json(datasets))
}

/// GET /schema
pub async fn get_root_schema(State(state): State<AppState>) -> Result<Json<SchemaNode>, AppError> {
    Ok(Json(state.client.get_schema(None).await?))
}

/// GET /schema/*id
pub async fn get_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
) -> Result<Json<SchemaNode>, AppError> {
    Ok(Json(state.client.get_schema(Some(&schema_id)).await?))
}

/// GET /database/*id
pub async fn get_database(
    State(state): State<AppState>,
    Path(database_id): Path<String>,
) -> Result<Json<SchemaNode>, AppError> {
    Ok(Json(state.client.get_dataset_detail(&database_id).await?))
}

/// POST /table
pub async fn query_table(
    State(state): State<AppState>,
    body: Result<Json<TableQuerySpec>, JsonRejection>,
) -> Result<Json<QueryResult>, AppError> {
    let Json(spec) = body?;
    Ok(Json(state.client.execute_query(&spec).await?))
}

/// POST /table/simple
pub async fn query_table_simple(
    State(state): State<AppState>,
    body: Result<Json<SimpleTableQuery>, JsonRejection>,
) -> Result<Json<QueryResult>, AppError> {
    let Json(query) = body?;
    Ok(Json(state.client.query_simple(&query).await?))
}

/// GET /rate_limit
pub async fn get_rate_limit(
    State(state): State<AppState>,
) -> Result<Json<RateLimitInfo>, AppError> {
    Ok(Json(state.client.get_rate_limit().await?))
}

/// GET /info
pub async fn get_info(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(state.client.get_info().await?))
}
