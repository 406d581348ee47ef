//! Query Builder
//!
//! Turns a simplified request (measures, row fields, optional column fields,
//! optional value filters) into a [`TableQuerySpec`]. Identifiers pass through
//! verbatim; whether they exist is for the provider to decide.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{RecodeSpec, TableQuerySpec};
use crate::error::{Result, StatXploreError};

/// Field id → value ids to keep, one output category per value.
pub type Filters = BTreeMap<String, Vec<String>>;

/// Simplified table request as accepted by the REST and MCP shells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTableQuery {
    pub database: String,
    pub measures: Vec<String>,
    pub row_fields: Vec<String>,
    #[serde(default)]
    pub column_fields: Option<Vec<String>>,
    #[serde(default)]
    pub filters: Option<Filters>,
}

impl SimpleTableQuery {
    pub fn build(&self) -> Result<TableQuerySpec> {
        build_simple_query(
            &self.database,
            &self.measures,
            &self.row_fields,
            self.column_fields.as_deref(),
            self.filters.as_ref(),
        )
    }
}

/// Build the native query for a rows × columns pivot.
///
/// `column_fields` becomes a second dimension group only when non-empty.
/// `filters` becomes one singleton-group recode per field, keeping the
/// caller's value order (which is also the output category order).
pub fn build_simple_query(
    database: &str,
    measures: &[String],
    row_fields: &[String],
    column_fields: Option<&[String]>,
    filters: Option<&Filters>,
) -> Result<TableQuerySpec> {
    if row_fields.is_empty() {
        return Err(StatXploreError::InvalidQuery(
            "row_fields must contain at least one field".into(),
        ));
    }

    let mut dimensions = vec![row_fields.to_vec()];
    if let Some(columns) = column_fields.filter(|c| !c.is_empty()) {
        dimensions.push(columns.to_vec());
    }

    let recodes = match filters {
        Some(filters) if !filters.is_empty() => {
            let mut recodes = BTreeMap::new();
            for (field, values) in filters {
                // An empty list would be sent as `{"map": []}`, which selects nothing.
                if values.is_empty() {
                    return Err(StatXploreError::InvalidQuery(format!(
                        "filter for '{}' lists no values",
                        field
                    )));
                }
                recodes.insert(field.clone(), RecodeSpec::singletons(values));
            }
            Some(recodes)
        }
        _ => None,
    };

    let spec = TableQuerySpec {
        database: database.to_string(),
        measures: measures.to_vec(),
        dimensions,
        recodes,
    };
    spec.validate()?;
    Ok(spec)
}
