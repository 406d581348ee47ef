//! Error types for the Stat-Xplore client
//!
//! Every failure the core can produce is a `StatXploreError` variant. The
//! presentation shells use [`StatXploreError::kind`] and
//! [`StatXploreError::http_status`] to keep the variants distinguishable.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatXploreError {
    /// A schema response could not be parsed into a node.
    #[error("schema parse error: {0}")]
    SchemaParse(String),

    /// The simplified request is structurally invalid. Raised before any
    /// network call is made.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The provider rejected a table query.
    #[error("query execution failed with status {status}: {body}")]
    QueryExecution { status: u16, body: String },

    /// The provider answered a table query successfully but the body is unusable.
    #[error("result parse error: {0}")]
    ResultParse(String),

    /// Non-success status on a read endpoint (schema, rate limit, info).
    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StatXploreError>;

impl StatXploreError {
    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SchemaParse(_) => "schema_parse",
            Self::InvalidQuery(_) => "invalid_query",
            Self::QueryExecution { .. } => "query_execution",
            Self::ResultParse(_) => "result_parse",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::Transport(_) => "transport",
            Self::Config(_) => "config",
        }
    }

    /// Status code the REST facade answers with.
    ///
    /// Provider client errors (4xx) are passed through; anything else the
    /// provider got wrong is a bad gateway.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidQuery(_) => 400,
            Self::QueryExecution { status, .. } | Self::UpstreamStatus { status, .. } => {
                if (400..500).contains(status) {
                    *status
                } else {
                    502
                }
            }
            Self::SchemaParse(_) | Self::ResultParse(_) | Self::Transport(_) => 502,
            Self::Config(_) => 500,
        }
    }

    /// Provider status and body, when the error carries them.
    pub fn upstream(&self) -> Option<(u16, &str)> {
        match self {
            Self::QueryExecution { status, body } | Self::UpstreamStatus { status, body } => {
                Some((*status, body.as_str()))
            }
            _ => None,
        }
    }
}
