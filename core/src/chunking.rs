#![deny(missing_docs)]

//! # Dependency Chunking
//!
//! CloudFormation throttles API Gateway when too many models are created at
//! once. Models without any dependency would all start concurrently, so they
//! are rewritten into `width` parallel chains: the model at position
//! `i + width` is made to depend on the model at position `i`.
//!
//! Models that already depend on something, and every non-model resource,
//! pass through untouched.

use crate::template::{Resource, ResourceGraph};
use indexmap::IndexSet;

/// Default number of parallel creation chains.
pub const DEFAULT_CHUNK_WIDTH: usize = 10;

/// Whether and how wide to chain independent models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Chaining is opt-in.
    pub enabled: bool,
    /// Maximum number of models created concurrently.
    pub width: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: DEFAULT_CHUNK_WIDTH,
        }
    }
}

/// Resources split by how chunking treats them. Each group keeps template order.
#[derive(Debug, Default)]
pub struct Partition {
    /// Models with no dependency; these get chained.
    pub free: Vec<(String, Resource)>,
    /// Models that already depend on something.
    pub constrained: Vec<(String, Resource)>,
    /// Every other resource kind.
    pub others: Vec<(String, Resource)>,
}

impl Partition {
    /// Splits a graph into its three groups.
    pub fn split(graph: ResourceGraph) -> Self {
        let mut partition = Self::default();
        for (name, resource) in graph {
            let group = if !resource.is_model() {
                &mut partition.others
            } else if resource.depends_on.is_empty() {
                &mut partition.free
            } else {
                &mut partition.constrained
            };
            group.push((name, resource));
        }
        partition
    }

    /// Recombines the groups: free models, then constrained models, then the rest.
    pub fn into_graph(self) -> ResourceGraph {
        self.free
            .into_iter()
            .chain(self.constrained)
            .chain(self.others)
            .collect()
    }
}

/// Chains independent model resources so at most `width` start together.
#[derive(Debug, Clone, Copy)]
pub struct DependencyChunker {
    width: usize,
}

impl DependencyChunker {
    /// Creates a chunker. A width of zero disables chaining.
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Rewrites the graph in place, returning how many models were chained.
    pub fn apply(&self, graph: &mut ResourceGraph) -> usize {
        let mut partition = Partition::split(std::mem::take(graph));
        let chained = self.chain(&mut partition.free);
        *graph = partition.into_graph();

        tracing::debug!(width = self.width, chained, "chained independent models");
        chained
    }

    /// Points each model at the one `width` positions before it.
    fn chain(&self, models: &mut [(String, Resource)]) -> usize {
        if self.width == 0 {
            return 0;
        }

        let chained = models.len().saturating_sub(self.width);
        for i in 0..chained {
            let parent = models[i].0.clone();
            models[i + self.width].1.depends_on = IndexSet::from([parent]);
        }
        chained
    }
}
