//! Candidate generation.
//!
//! Narrow mode takes item containers straight from a host selector. Generic
//! mode clusters links by destination: links sharing a target contribute
//! their common ancestor, every link is a candidate itself, and every
//! candidate contributes its nearest ancestors.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::patterns::LINK_SELECTOR;
use crate::site::SiteOverride;
use crate::tree::VisualTree;
use crate::url_utils::create_absolute_url;

/// How far above each candidate the search widens.
const ANCESTOR_DEPTH: usize = 8;

/// Candidate nodes below `root`, in discovery order, without duplicates.
pub(crate) fn generate<T: VisualTree>(tree: &T, root: T::Node, site: &SiteOverride) -> Vec<T::Node> {
    if let Some(selector) = &site.item_selector {
        let candidates = tree.query_all(root, selector);
        debug!(selector = %selector, count = candidates.len(), "narrow candidates");
        return candidates;
    }

    let mut candidates = Candidates::default();
    let links = tree.query_all(root, LINK_SELECTOR);

    for group in group_by_target(tree, &links) {
        if group.len() < 2 {
            continue;
        }
        let ancestor = common_ancestor(tree, &group);
        debug_assert!(ancestor.is_some(), "link group without a common ancestor");
        if let Some(ancestor) = ancestor.filter(|&a| a != root && tree.contains(root, a)) {
            candidates.push(ancestor);
        }
    }

    for &link in &links {
        candidates.push(link);
    }

    let seeds = candidates.nodes.clone();
    for node in seeds {
        for ancestor in tree.ancestors(node, ANCESTOR_DEPTH) {
            if ancestor == root {
                break;
            }
            candidates.push(ancestor);
        }
    }

    debug!(links = links.len(), count = candidates.nodes.len(), "generic candidates");
    candidates.nodes
}

/// Insertion-ordered set.
struct Candidates<N> {
    nodes: Vec<N>,
    seen: HashSet<N>,
}

impl<N> Default for Candidates<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<N: Copy + Eq + std::hash::Hash> Candidates<N> {
    fn push(&mut self, node: N) {
        if self.seen.insert(node) {
            self.nodes.push(node);
        }
    }
}

/// Links grouped by resolved target, groups in first-seen order. Links
/// without a usable `href` are left out.
fn group_by_target<T: VisualTree>(tree: &T, links: &[T::Node]) -> Vec<Vec<T::Node>> {
    let mut groups: Vec<Vec<T::Node>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for &link in links {
        let Some(target) = tree
            .attr(link, "href")
            .and_then(|href| create_absolute_url(&href, tree.page_url()))
        else {
            continue;
        };
        match index.get(&target) {
            Some(&i) => groups[i].push(link),
            None => {
                index.insert(target, groups.len());
                groups.push(vec![link]);
            }
        }
    }

    groups
}

/// Deepest node containing every node of `nodes`.
pub(crate) fn common_ancestor<T: VisualTree>(tree: &T, nodes: &[T::Node]) -> Option<T::Node> {
    let (&first, rest) = nodes.split_first()?;
    let mut path = tree.path_from_top(first);
    for &node in rest {
        let other = tree.path_from_top(node);
        let shared = path.iter().zip(&other).take_while(|(a, b)| a == b).count();
        path.truncate(shared);
    }
    path.last().copied()
}
