//! Schema Explorer
//!
//! Fetches schema nodes and walks the lazily-loaded folder tree to discover
//! every dataset. Folder children are fetched on first visit; a folder whose
//! expansion fails is treated as empty so one broken subtree cannot hide its
//! siblings.

use std::collections::HashSet;
use std::ops::ControlFlow;

use tracing::{debug, info, warn};

use super::types::{dataset_schema_path, schema_node_path, Children, DatasetReference, SchemaNode};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::Result;
use crate::transport::Transport;

/// Options controlling schema traversal
#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    /// Deepest folder level whose children are still visited. The root is depth 0.
    pub max_depth: usize,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Counters reported at the end of a traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub datasets: usize,
    pub folders_expanded: usize,
    pub folders_failed: usize,
    /// Folders whose children were not visited because of `max_depth`.
    pub depth_limited: usize,
    /// The visitor asked to stop before the tree was exhausted.
    pub stopped_early: bool,
}

pub struct SchemaExplorer<'a> {
    transport: &'a dyn Transport,
    options: ExplorerOptions,
}

impl<'a> SchemaExplorer<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self::with_options(transport, ExplorerOptions::default())
    }

    pub fn with_options(transport: &'a dyn Transport, options: ExplorerOptions) -> Self {
        Self { transport, options }
    }

    /// Fetch a single schema node. `None` (or an empty id) fetches the root listing.
    pub async fn fetch_node(&self, id: Option<&str>) -> Result<SchemaNode> {
        let path = match id {
            Some(id) if !id.is_empty() => schema_node_path(id)?,
            _ => "/schema".to_string(),
        };
        let response = self.transport.get(&path).await?.error_for_status()?;
        SchemaNode::from_json_str(&response.body)
    }

    /// Fetch a dataset's schema, accepting either `UC_Monthly` or
    /// `str:database:UC_Monthly`.
    pub async fn get_dataset_detail(&self, dataset_id: &str) -> Result<SchemaNode> {
        self.fetch_node(Some(&dataset_schema_path(dataset_id))).await
    }

    /// Every dataset reachable from the root, depth-first, each exactly once.
    pub async fn list_datasets(&self) -> Result<Vec<DatasetReference>> {
        let mut datasets = Vec::new();
        self.visit_datasets(|dataset| {
            datasets.push(dataset.clone());
            ControlFlow::Continue(())
        })
        .await?;
        Ok(datasets)
    }

    /// Walk the tree, handing each dataset to `on_dataset` as it is found.
    ///
    /// Returning `ControlFlow::Break` stops the walk before the next node is
    /// visited. Only the root fetch can fail the traversal.
    pub async fn visit_datasets<F>(&self, mut on_dataset: F) -> Result<TraversalStats>
    where
        F: FnMut(&DatasetReference) -> ControlFlow<()> + Send,
    {
        let root = self.fetch_node(None).await?;

        let mut stats = TraversalStats::default();
        let mut emitted: HashSet<String> = HashSet::new();
        let mut expanded: HashSet<String> = HashSet::new();
        // Stack contains (node, depth); children are pushed in reverse so they
        // pop in provider order.
        let mut stack: Vec<(SchemaNode, usize)> = vec![(root, 0)];

        while let Some((node, depth)) = stack.pop() {
            if let Some(dataset) = DatasetReference::from_node(&node) {
                if !emitted.insert(dataset.id.clone()) {
                    debug!(dataset = %dataset.id, "dataset already emitted");
                    continue;
                }
                stats.datasets += 1;
                if on_dataset(&dataset).is_break() {
                    stats.stopped_early = true;
                    break;
                }
                continue;
            }
            // Other kinds, or no kind at all, are leaves.
            if !node.is_folder() {
                continue;
            }

            let has_children = match &node.children {
                Children::Unfetched => !node.id.is_empty(),
                Children::Empty => false,
                Children::Populated(_) => true,
            };
            if !has_children {
                continue;
            }
            if depth >= self.options.max_depth {
                warn!(
                    folder = %node.id,
                    depth,
                    max_depth = self.options.max_depth,
                    "max depth reached, not descending"
                );
                stats.depth_limited += 1;
                continue;
            }

            let children = match node.children {
                Children::Unfetched => {
                    if !expanded.insert(node.id.clone()) {
                        debug!(folder = %node.id, "folder already expanded");
                        continue;
                    }
                    match self.fetch_node(Some(&node.id)).await {
                        Ok(fetched) => {
                            stats.folders_expanded += 1;
                            fetched.children.into_vec()
                        }
                        Err(e) => {
                            warn!(
                                folder = %node.id,
                                kind = e.kind(),
                                "Failed to expand folder, treating as empty: {}",
                                e
                            );
                            stats.folders_failed += 1;
                            continue;
                        }
                    }
                }
                loaded => loaded.into_vec(),
            };

            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }

        info!(
            datasets = stats.datasets,
            folders_expanded = stats.folders_expanded,
            folders_failed = stats.folders_failed,
            depth_limited = stats.depth_limited,
            "schema traversal complete"
        );
        Ok(stats)
    }
}
