//! Result Normalizer
//!
//! Maps a raw `POST /table` response into a [`QueryResult`]. Missing sections
//! default to empty; sections that are present must have the right shape.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::types::QueryResult;
use crate::error::{Result, StatXploreError};

/// Normalize a parsed provider response.
pub fn normalize(raw: &Value) -> Result<QueryResult> {
    let obj = raw
        .as_object()
        .ok_or_else(|| StatXploreError::ResultParse("response is not a JSON object".into()))?;

    if !has_section(obj, "fields") && !has_section(obj, "cubes") {
        return Err(StatXploreError::ResultParse(
            "response has neither 'fields' nor 'cubes'".into(),
        ));
    }

    Ok(QueryResult {
        fields: section(obj, "fields")?.unwrap_or_default(),
        measures: section(obj, "measures")?.unwrap_or_default(),
        cubes: section(obj, "cubes")?.unwrap_or_default(),
        database: obj.get("database").filter(|v| !v.is_null()).cloned(),
    })
}

/// Normalize a raw response body.
pub fn normalize_body(body: &str) -> Result<QueryResult> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| StatXploreError::ResultParse(format!("body is not JSON: {}", e)))?;
    normalize(&raw)
}

fn has_section(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(|v| !v.is_null())
}

fn section<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Result<Option<T>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|e| StatXploreError::ResultParse(format!("invalid '{}' section: {}", key, e))),
    }
}
