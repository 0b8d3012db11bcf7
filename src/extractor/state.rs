//! Extraction state tracking.
//!
//! `ExtractionState` holds the per-run bookkeeping of the candidate loop: the
//! processed-set and the accepted items in discovery order.

use std::collections::HashSet;
use std::hash::Hash;

use crate::result::ExtractedItem;
use crate::tree::VisualTree;

/// Tracks which nodes have been evaluated and which were accepted.
///
/// # Purpose
///
/// - **Processed Nodes**: a node reached through several candidate paths
///   (a link and its promoted ancestor, say) is evaluated once
/// - **Accepted Items**: discovery-ordered list used for the containment
///   check; output order is decided later
#[derive(Debug)]
pub struct ExtractionState<N> {
    processed_nodes: HashSet<N>,
    accepted: Vec<(N, ExtractedItem)>,
}

impl<N: Copy + Eq + Hash> ExtractionState<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            processed_nodes: HashSet::new(),
            accepted: Vec::new(),
        }
    }

    /// Mark a node as processed
    pub fn mark_done(&mut self, node: N) {
        self.processed_nodes.insert(node);
    }

    /// Check if a node has been processed
    #[must_use]
    pub fn is_done(&self, node: N) -> bool {
        self.processed_nodes.contains(&node)
    }

    /// Whether `node` contains, or is contained by, an accepted node.
    pub fn overlaps<T>(&self, tree: &T, node: N) -> bool
    where
        T: VisualTree<Node = N>,
    {
        self.accepted
            .iter()
            .any(|&(other, _)| tree.contains(other, node) || tree.contains(node, other))
    }

    pub fn accept(&mut self, node: N, item: ExtractedItem) {
        self.accepted.push((node, item));
    }

    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Accepted items with their originating nodes, in discovery order.
    #[must_use]
    pub fn into_accepted(self) -> Vec<(N, ExtractedItem)> {
        self.accepted
    }
}

impl<N: Copy + Eq + Hash> Default for ExtractionState<N> {
    fn default() -> Self {
        Self::new()
    }
}
