//! Table query types
//!
//! `TableQuerySpec` serializes to the provider's `POST /table` body;
//! `QueryResult` is the normalized response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StatXploreError};

/// Provider-side regrouping of a field's raw values.
///
/// Each inner list collapses into one output category, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecodeSpec {
    pub map: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<bool>,
}

impl RecodeSpec {
    /// One output category per value, in the given order.
    pub fn singletons<S: AsRef<str>>(values: &[S]) -> Self {
        Self {
            map: values.iter().map(|v| vec![v.as_ref().to_string()]).collect(),
            total: None,
        }
    }
}

/// A pivot-table query in the provider's native shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuerySpec {
    pub database: String,
    pub measures: Vec<String>,
    /// Group 0 is the row axis, group 1 (optional) the column axis.
    pub dimensions: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recodes: Option<BTreeMap<String, RecodeSpec>>,
}

impl TableQuerySpec {
    /// Structural checks made before the query leaves the process.
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(invalid("database must not be empty"));
        }
        if self.measures.is_empty() {
            return Err(invalid("at least one measure is required"));
        }
        if self.dimensions.is_empty() {
            return Err(invalid("at least one dimension group is required"));
        }
        if let Some(index) = self.dimensions.iter().position(Vec::is_empty) {
            return Err(invalid(format!("dimension group {} is empty", index)));
        }
        if let Some(recodes) = &self.recodes {
            for (field, recode) in recodes {
                if recode.map.is_empty() {
                    return Err(invalid(format!("recode for '{}' has no groups", field)));
                }
            }
        }
        Ok(())
    }

    pub fn row_fields(&self) -> &[String] {
        self.dimensions.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn column_fields(&self) -> Option<&[String]> {
        self.dimensions.get(1).map(Vec::as_slice)
    }

    /// JSON body for `POST /table`; absent optional parts are omitted, not `null`.
    pub fn to_wire(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| invalid(format!("query could not be serialized: {}", e)))
    }
}

fn invalid(msg: impl Into<String>) -> StatXploreError {
    StatXploreError::InvalidQuery(msg.into())
}

/// One category of a result field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub uri: String,
    pub label: String,
    #[serde(default)]
    pub items: Vec<FieldItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureInfo {
    pub uri: String,
    pub label: String,
}

/// One measure's values plus the number of implied decimal places.
///
/// `values` is stored exactly as the provider sent it. Interpreting a value
/// means multiplying it by [`CubeData::scale_factor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeData {
    pub values: Vec<Value>,
    #[serde(default)]
    pub precision: i32,
}

impl CubeData {
    /// `10^-precision`
    pub fn scale_factor(&self) -> f64 {
        10f64.powi(-self.precision)
    }

    /// Row-major numeric view of `values`; nested arrays are flattened and
    /// non-numeric cells become `None`. Values are not scaled.
    pub fn flattened_values(&self) -> Vec<Option<f64>> {
        let mut out = Vec::with_capacity(self.values.len());
        flatten_into(&self.values, &mut out);
        out
    }
}

fn flatten_into(values: &[Value], out: &mut Vec<Option<f64>>) {
    for value in values {
        match value {
            Value::Array(inner) => flatten_into(inner, out),
            Value::Number(n) => out.push(n.as_f64()),
            _ => out.push(None),
        }
    }
}

/// Normalized response of a table query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub fields: Vec<FieldInfo>,
    pub measures: Vec<MeasureInfo>,
    pub cubes: BTreeMap<String, CubeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> TableQuerySpec {
        TableQuerySpec {
            database: "str:database:UC_Monthly".into(),
            measures: vec!["str:count:UC_Monthly:V_F_UC_CASELOAD_FULL".into()],
            dimensions: vec![vec!["region".into()]],
            recodes: None,
        }
    }

    #[test]
    fn wire_omits_absent_recodes() {
        let wire = spec().to_wire().unwrap();
        assert!(wire.get("recodes").is_none());
        assert_eq!(wire["dimensions"], json!([["region"]]));
    }

    #[test]
    fn wire_omits_absent_total() {
        let mut spec = spec();
        let mut recodes = BTreeMap::new();
        recodes.insert("sex".to_string(), RecodeSpec::singletons(&["M", "F"]));
        recodes.insert(
            "age".to_string(),
            RecodeSpec {
                map: vec![vec!["16-24".into(), "25-34".into()]],
                total: Some(true),
            },
        );
        spec.recodes = Some(recodes);

        let wire = spec.to_wire().unwrap();
        assert_eq!(wire["recodes"]["sex"], json!({"map": [["M"], ["F"]]}));
        assert_eq!(
            wire["recodes"]["age"],
            json!({"map": [["16-24", "25-34"]], "total": true})
        );
    }

    #[test]
    fn validate_rejects_structural_problems() {
        assert!(spec().validate().is_ok());

        let mut no_measures = spec();
        no_measures.measures.clear();
        assert_eq!(no_measures.validate().unwrap_err().kind(), "invalid_query");

        let mut no_dims = spec();
        no_dims.dimensions.clear();
        assert!(no_dims.validate().is_err());

        let mut empty_group = spec();
        empty_group.dimensions.push(vec![]);
        assert!(empty_group
            .validate()
            .unwrap_err()
            .to_string()
            .contains("dimension group 1"));
    }

    #[test]
    fn axis_accessors() {
        let mut spec = spec();
        assert_eq!(spec.row_fields(), ["region".to_string()]);
        assert!(spec.column_fields().is_none());
        spec.dimensions.push(vec!["period".into()]);
        assert_eq!(spec.column_fields(), Some(&["period".to_string()][..]));
    }

    #[test]
    fn cube_values_are_not_prescaled() {
        let cube: CubeData =
            serde_json::from_value(json!({"values": [[1234, 5678], [null, 9]], "precision": 2}))
                .unwrap();
        assert_eq!(cube.values, vec![json!([1234, 5678]), json!([null, 9])]);
        assert_eq!(
            cube.flattened_values(),
            vec![Some(1234.0), Some(5678.0), None, Some(9.0)]
        );
        assert!((cube.scale_factor() - 0.01).abs() < f64::EPSILON);
    }
}
