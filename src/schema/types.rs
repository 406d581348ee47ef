//! Schema model
//!
//! Typed form of the provider's schema nodes. The wire shape is
//! `{id, label, location, type?, children?}`; `children` distinguishes
//! "not fetched yet" (absent or `null`) from "fetched, none" (`[]`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Result, StatXploreError};

/// Namespace prefix the provider uses for dataset identifiers.
pub const DATABASE_ID_PREFIX: &str = "str:database:";

/// Kind of a schema node as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Folder,
    Database,
    /// Any other provider node type, kept verbatim.
    Other(String),
}

impl NodeKind {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "FOLDER" => Self::Folder,
            "DATABASE" => Self::Database,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Folder => "FOLDER",
            Self::Database => "DATABASE",
            Self::Other(raw) => raw,
        }
    }
}

/// Load state of a node's children.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Children {
    /// The provider has not been asked for this node's children.
    #[default]
    Unfetched,
    /// Fetched, and there are none.
    Empty,
    Populated(Vec<SchemaNode>),
}

impl Children {
    pub fn from_wire(children: Option<Vec<SchemaNode>>) -> Self {
        match children {
            None => Self::Unfetched,
            Some(nodes) if nodes.is_empty() => Self::Empty,
            Some(nodes) => Self::Populated(nodes),
        }
    }

    pub fn into_wire(self) -> Option<Vec<SchemaNode>> {
        match self {
            Self::Unfetched => None,
            Self::Empty => Some(Vec::new()),
            Self::Populated(nodes) => Some(nodes),
        }
    }

    pub fn is_unfetched(&self) -> bool {
        matches!(self, Self::Unfetched)
    }

    /// Loaded children; empty for both `Unfetched` and `Empty`.
    pub fn as_slice(&self) -> &[SchemaNode] {
        match self {
            Self::Populated(nodes) => nodes,
            Self::Unfetched | Self::Empty => &[],
        }
    }

    pub fn into_vec(self) -> Vec<SchemaNode> {
        match self {
            Self::Populated(nodes) => nodes,
            Self::Unfetched | Self::Empty => Vec::new(),
        }
    }
}

/// A folder or dataset in the provider's schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSchemaNode", into = "WireSchemaNode")]
pub struct SchemaNode {
    pub id: String,
    pub label: String,
    pub location: String,
    pub kind: Option<NodeKind>,
    pub children: Children,
}

impl SchemaNode {
    /// Parse one node from a provider JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(StatXploreError::SchemaParse(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| StatXploreError::SchemaParse(e.to_string()))
    }

    /// Parse one node from a raw response body.
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| StatXploreError::SchemaParse(format!("body is not JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn is_folder(&self) -> bool {
        self.kind == Some(NodeKind::Folder)
    }

    pub fn is_database(&self) -> bool {
        self.kind == Some(NodeKind::Database)
    }
}

#[derive(Serialize, Deserialize)]
struct WireSchemaNode {
    id: String,
    label: String,
    location: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<SchemaNode>>,
}

impl From<WireSchemaNode> for SchemaNode {
    fn from(wire: WireSchemaNode) -> Self {
        Self {
            id: wire.id,
            label: wire.label,
            location: wire.location,
            kind: wire.node_type.as_deref().map(NodeKind::from_wire),
            children: Children::from_wire(wire.children),
        }
    }
}

impl From<SchemaNode> for WireSchemaNode {
    fn from(node: SchemaNode) -> Self {
        Self {
            id: node.id,
            label: node.label,
            location: node.location,
            node_type: node.kind.map(|k| k.as_str().to_string()),
            children: node.children.into_wire(),
        }
    }
}

/// A schema node known to be a queryable dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReference {
    pub id: String,
    pub label: String,
    pub location: String,
}

impl DatasetReference {
    /// `Some` only for nodes of kind `DATABASE`.
    pub fn from_node(node: &SchemaNode) -> Option<Self> {
        node.is_database().then(|| Self {
            id: node.id.clone(),
            label: node.label.clone(),
            location: node.location.clone(),
        })
    }
}

/// Resolve a bare dataset identifier into the provider's dataset path.
pub fn dataset_schema_path(dataset_id: &str) -> String {
    if dataset_id.starts_with(DATABASE_ID_PREFIX) {
        dataset_id.to_string()
    } else {
        format!("{}{}", DATABASE_ID_PREFIX, dataset_id)
    }
}

/// `/schema/{id}` with the id percent-encoded as a single path segment.
pub fn schema_node_path(id: &str) -> Result<String> {
    let mut url = Url::parse(SCHEMA_PATH_BASE)
        .map_err(|e| StatXploreError::Config(format!("invalid schema path base: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| StatXploreError::Config("schema path base cannot take segments".into()))?
        .push(id);
    Ok(url.path().to_string())
}

// Only the path of this URL is used.
const SCHEMA_PATH_BASE: &str = "http://localhost/schema";

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
