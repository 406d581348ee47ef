//! Pivot-table queries
//!
//! - [`builder`]: simplified request → native query
//! - [`normalize`]: raw response → [`QueryResult`]
//! - [`types`]: request and result types

pub mod builder;
pub mod normalize;
pub mod types;

pub use builder::{build_simple_query, Filters, SimpleTableQuery};
pub use normalize::{normalize, normalize_body};
pub use types::*;
