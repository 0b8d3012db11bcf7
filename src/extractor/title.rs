//! Product title extraction.
//!
//! Every text-owning element of the row is a contender. Contenders meet
//! pairwise in document order and the winner of each match stays on:
//!
//! 1. at least two characters beats shorter
//! 2. net ancestor class score (`title|name|brand` up, `price|model` down)
//! 3. larger rendered area
//! 4. larger font
//! 5. longer raw text
//!
//! A full tie keeps the earlier contender.

use std::cmp::Ordering;

use crate::extractor::candidates::common_ancestor;
use crate::patterns::{TITLE_CLASS, TITLE_PENALTY_CLASS, TITLE_SELECTOR};
use crate::tree::VisualTree;

struct Contender<N> {
    node: N,
    text: String,
    area: f64,
    font_size: f64,
    raw_len: usize,
}

/// Trimmed visible text of the row's title element.
pub(crate) fn extract_title<T: VisualTree>(tree: &T, node: T::Node) -> Option<String> {
    let contenders: Vec<Contender<T::Node>> = tree
        .query_all(node, TITLE_SELECTOR)
        .into_iter()
        .filter(|&n| tree.has_own_text(n))
        .filter_map(|n| contender(tree, n))
        .collect();

    contenders
        .into_iter()
        .reduce(|best, next| {
            if compare(tree, &next, &best) == Ordering::Greater {
                next
            } else {
                best
            }
        })
        .map(|winner| winner.text)
}

fn contender<T: VisualTree>(tree: &T, node: T::Node) -> Option<Contender<T::Node>> {
    let text = tree.inner_text(node).trim().to_string();
    if text.is_empty() || text.eq_ignore_ascii_case("sponsored") {
        return None;
    }

    let rect = tree.bounding_rect(node);
    if rect.width <= 1.0 || rect.height <= 1.0 {
        return None;
    }

    let raw = tree.text_content(node);
    let children = tree.children(node);
    let echoes = [children.first(), children.last()]
        .into_iter()
        .flatten()
        .any(|&child| tree.text_content(child).trim() == raw.trim());
    if echoes {
        return None;
    }

    Some(Contender {
        node,
        text,
        area: rect.area(),
        font_size: tree.style(node).font_size,
        raw_len: raw.chars().count(),
    })
}

/// How `a` ranks against `b`.
fn compare<T: VisualTree>(tree: &T, a: &Contender<T::Node>, b: &Contender<T::Node>) -> Ordering {
    let long_enough = |c: &Contender<T::Node>| c.text.chars().count() >= 2;

    long_enough(a)
        .cmp(&long_enough(b))
        .then_with(|| {
            let lca = common_ancestor(tree, &[a.node, b.node]);
            ancestor_score(tree, a.node, lca).cmp(&ancestor_score(tree, b.node, lca))
        })
        .then_with(|| a.area.total_cmp(&b.area))
        .then_with(|| a.font_size.total_cmp(&b.font_size))
        .then_with(|| a.raw_len.cmp(&b.raw_len))
}

/// Class score of the path from `node` up to, not including, `stop`.
fn ancestor_score<T: VisualTree>(tree: &T, node: T::Node, stop: Option<T::Node>) -> i32 {
    let mut names = String::new();
    let mut current = Some(node);
    while let Some(n) = current {
        if Some(n) == stop {
            break;
        }
        names.push_str(&tree.class_and_id(n));
        names.push(' ');
        current = tree.parent(n);
    }
    i32::from(TITLE_CLASS.is_match(&names)) - i32::from(TITLE_PENALTY_CLASS.is_match(&names))
}
