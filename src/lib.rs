//! Stat-Xplore client, REST facade and MCP server
//!
//! The core discovers datasets in the provider's lazily-loaded schema tree and
//! turns simplified row/column/filter requests into native pivot-table queries.
//!
//! ## Layout
//!
//! ```text
//!   api (REST, feature "server")     mcp (stdio JSON-RPC, feature "mcp")
//!                  \                       /
//!                   +--- StatXploreClient -+
//!                   |                      |
//!          schema::SchemaExplorer    query::{builder, normalize}
//!                   \                      /
//!                    +---- Transport -----+      rate_limit
//!                          (reqwest)
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod rate_limit;
pub mod schema;
pub mod transport;

#[cfg(feature = "server")]
pub mod api;

#[cfg(feature = "mcp")]
pub mod mcp;

pub use client::StatXploreClient;
pub use config::Settings;
pub use error::{Result, StatXploreError};
pub use query::{build_simple_query, normalize, QueryResult, SimpleTableQuery, TableQuerySpec};
pub use rate_limit::RateLimitInfo;
pub use schema::{DatasetReference, SchemaExplorer, SchemaNode};
pub use transport::{HttpTransport, Transport, TransportResponse};
