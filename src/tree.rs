//! Visual tree capability interface.
//!
//! The extraction engine never talks to a concrete DOM. It only needs the
//! handful of operations below, so any tree that can answer them (a parsed
//! snapshot, a live renderer bridge, a virtual DOM) can be scanned.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use url::Url;

/// Axis-aligned border box in CSS pixels, document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rect covering both. Empty rects are ignored.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Outer display type, reduced to what the engine distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Inline,
    Block,
    None,
}

/// The subset of computed style the engine reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub visible: bool,
    pub line_through: bool,
    pub font_size: f64,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Inline,
            visible: true,
            line_through: false,
            font_size: 16.0,
        }
    }
}

/// Read-only access to a rendered document tree.
///
/// Node handles are cheap copies valid for the lifetime of the tree. All
/// navigation is over element nodes; text nodes are only observable through
/// the text accessors.
pub trait VisualTree {
    type Node: Copy + Eq + Hash + Debug;

    /// Scope of the scan. `None` when the expected root has not rendered yet.
    fn root(&self) -> Option<Self::Node>;

    /// URL of the page, used for hostname policy and relative URL resolution.
    fn page_url(&self) -> &Url;

    fn viewport_width(&self) -> f64;

    /// Lowercase tag name.
    fn tag_name(&self, node: Self::Node) -> String;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn attr(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Raw text of all descendant text nodes, hidden or not.
    fn text_content(&self, node: Self::Node) -> String;

    /// Rendered text: hidden subtrees skipped, whitespace collapsed, block
    /// boundaries as line breaks.
    fn inner_text(&self, node: Self::Node) -> String;

    /// True if a direct text child carries non-whitespace text.
    fn has_own_text(&self, node: Self::Node) -> bool;

    /// Serialized markup of the node and its subtree.
    fn outer_html(&self, node: Self::Node) -> String;

    fn bounding_rect(&self, node: Self::Node) -> Rect;

    /// Layout width and height; zero for non-rendered nodes.
    fn offset_size(&self, node: Self::Node) -> (f64, f64) {
        let rect = self.bounding_rect(node);
        (rect.width, rect.height)
    }

    fn style(&self, node: Self::Node) -> ComputedStyle;

    /// Descendants of `scope` (excluding `scope`) matching a CSS selector, in
    /// document order. An unparsable selector matches nothing.
    fn query_all(&self, scope: Self::Node, selector: &str) -> Vec<Self::Node>;

    fn query_first(&self, scope: Self::Node, selector: &str) -> Option<Self::Node> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Inclusive containment, like DOM `Node.contains`.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Ancestors nearest first, at most `depth` of them.
    fn ancestors(&self, node: Self::Node, depth: usize) -> Vec<Self::Node> {
        let mut out = Vec::with_capacity(depth);
        let mut current = self.parent(node);
        while let Some(n) = current {
            if out.len() == depth {
                break;
            }
            out.push(n);
            current = self.parent(n);
        }
        out
    }

    /// Document order comparison. An ancestor precedes its descendants.
    fn document_position(&self, a: Self::Node, b: Self::Node) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        if self.contains(a, b) {
            return Ordering::Less;
        }
        if self.contains(b, a) {
            return Ordering::Greater;
        }

        let path_a = self.path_from_top(a);
        let path_b = self.path_from_top(b);
        let shared = path_a
            .iter()
            .zip(&path_b)
            .take_while(|(x, y)| x == y)
            .count();
        // Both diverge below the lowest common ancestor; compare the two
        // diverging children by sibling position.
        let (Some(&branch_a), Some(&branch_b)) = (path_a.get(shared), path_b.get(shared)) else {
            return Ordering::Equal;
        };
        let Some(parent) = shared.checked_sub(1).map(|i| path_a[i]) else {
            return Ordering::Equal;
        };
        for child in self.children(parent) {
            if child == branch_a {
                return Ordering::Less;
            }
            if child == branch_b {
                return Ordering::Greater;
            }
        }
        Ordering::Equal
    }

    /// Node and its ancestors, topmost first.
    fn path_from_top(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut path = vec![node];
        let mut current = self.parent(node);
        while let Some(n) = current {
            path.push(n);
            current = self.parent(n);
        }
        path.reverse();
        path
    }

    /// `class` and `id` attribute values joined by a space.
    fn class_and_id(&self, node: Self::Node) -> String {
        let class = self.attr(node, "class").unwrap_or_default();
        let id = self.attr(node, "id").unwrap_or_default();
        format!("{class} {id}")
    }
}
