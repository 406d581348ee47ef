//! Schema discovery
//!
//! - [`types`]: the typed schema node model
//! - [`explorer`]: node fetching and dataset discovery over the lazy tree

pub mod explorer;
pub mod types;

pub use explorer::{ExplorerOptions, SchemaExplorer, TraversalStats};
pub use types::*;
