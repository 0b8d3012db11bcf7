//! Parsed page snapshots.
//!
//! [`HtmlSnapshot`] implements [`VisualTree`] over a serialized page. Layout
//! is computed once at parse time (see [`layout`]) so geometry queries during
//! a scan are lookups.

mod layout;
mod text;

use std::collections::HashMap;

use tracing::debug;
use url::Url;

use crate::dom::{self, Document, NodeId, NodeRef, Selection};
use crate::encoding::transcode_to_utf8;
use crate::error::{Error, Result};
use crate::tree::{ComputedStyle, Rect, VisualTree};

use layout::ElementLayout;

const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

/// A static page snapshot.
///
/// # Example
///
/// ```rust
/// use rs_cart_extraction::{HtmlSnapshot, VisualTree};
///
/// let snapshot = HtmlSnapshot::parse(
///     "<div id=cart><span>Blue Mug</span></div>",
///     "https://shop.example/cart",
/// )?
/// .with_root("#cart");
///
/// let root = snapshot.root().unwrap();
/// assert_eq!(snapshot.inner_text(root), "Blue Mug");
/// # Ok::<(), rs_cart_extraction::Error>(())
/// ```
pub struct HtmlSnapshot {
    doc: Document,
    page_url: Url,
    viewport_width: f64,
    root_selector: Option<String>,
    layout: HashMap<NodeId, ElementLayout>,
}

impl std::fmt::Debug for HtmlSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlSnapshot")
            .field("page_url", &self.page_url.as_str())
            .field("viewport_width", &self.viewport_width)
            .field("root_selector", &self.root_selector)
            .field("elements", &self.layout.len())
            .finish_non_exhaustive()
    }
}

impl HtmlSnapshot {
    /// Parse an HTML snapshot captured at `page_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `page_url` is not an absolute URL.
    pub fn parse(html: &str, page_url: &str) -> Result<Self> {
        let page_url = Url::parse(page_url).map_err(|source| Error::InvalidUrl {
            url: page_url.to_string(),
            source,
        })?;

        let doc = dom::parse(html);
        let layout = layout::compute(&doc);
        debug!(url = %page_url, elements = layout.len(), "parsed snapshot");

        Ok(Self {
            doc,
            page_url,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            root_selector: None,
            layout,
        })
    }

    /// Parse raw bytes, detecting the character encoding first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `page_url` is not an absolute URL.
    pub fn from_bytes(bytes: &[u8], page_url: &str) -> Result<Self> {
        Self::parse(&transcode_to_utf8(bytes), page_url)
    }

    /// Viewport width used by the area limit. Default: 1280.
    #[must_use]
    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    /// Scan only below the first element matching `selector`. When nothing
    /// matches, [`VisualTree::root`] reports the page as not rendered yet.
    #[must_use]
    pub fn with_root(mut self, selector: &str) -> Self {
        self.root_selector = Some(selector.to_string());
        self
    }

    fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(id, &self.doc.tree)
    }

    fn layout_of(&self, id: NodeId) -> ElementLayout {
        self.layout.get(&id).copied().unwrap_or_default()
    }
}

impl VisualTree for HtmlSnapshot {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        let selector = self.root_selector.as_deref().unwrap_or("body");
        self.doc
            .try_select(selector)
            .and_then(|sel| sel.nodes().first().map(|n| n.id))
    }

    fn page_url(&self) -> &Url {
        &self.page_url
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn tag_name(&self, node: NodeId) -> String {
        dom::tag_name(&self.node(node)).unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)
            .parent()
            .filter(NodeRef::is_element)
            .map(|p| p.id)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        dom::element_children(&self.node(node))
            .into_iter()
            .map(|c| c.id)
            .collect()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        dom::get_attribute(&self.node(node), name)
    }

    fn text_content(&self, node: NodeId) -> String {
        self.node(node).text().to_string()
    }

    fn inner_text(&self, node: NodeId) -> String {
        text::inner_text(&self.node(node), &self.layout)
    }

    fn has_own_text(&self, node: NodeId) -> bool {
        dom::has_own_text(&self.node(node))
    }

    fn outer_html(&self, node: NodeId) -> String {
        self.node(node).html().to_string()
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.layout_of(node).rect
    }

    fn style(&self, node: NodeId) -> ComputedStyle {
        self.layout_of(node).style
    }

    fn query_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        Selection::from(self.node(scope))
            .try_select(selector)
            .map(|sel| sel.nodes().iter().map(|n| n.id).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;
    use crate::tree::Display;

    const PAGE: &str = "https://shop.example/cart";

    fn snapshot(html: &str) -> HtmlSnapshot {
        HtmlSnapshot::parse(html, PAGE).unwrap()
    }

    fn first(s: &HtmlSnapshot, selector: &str) -> NodeId {
        let root = s.root().unwrap();
        s.query_first(root, selector).unwrap()
    }

    #[test]
    fn rejects_relative_page_url() {
        let err = HtmlSnapshot::parse("<p>x</p>", "/cart").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn root_defaults_to_body() {
        let s = snapshot("<div>x</div>");
        assert_eq!(s.tag_name(s.root().unwrap()), "body");
    }

    #[test]
    fn missing_root_is_none() {
        let s = snapshot("<div>x</div>").with_root("#cart");
        assert!(s.root().is_none());
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let s = snapshot("<div>x</div>");
        let root = s.root().unwrap();
        assert!(s.query_all(root, "div[").is_empty());
        assert!(s.with_root("[[").root().is_none());
    }

    #[test]
    fn navigation_over_elements() {
        let s = snapshot("<div id=a>text<span id=b>x</span><em id=c>y</em></div>");
        let a = first(&s, "#a");
        let b = first(&s, "#b");
        let c = first(&s, "#c");
        assert_eq!(s.children(a), vec![b, c]);
        assert_eq!(s.parent(b), Some(a));
        assert!(s.contains(a, c));
        assert!(!s.contains(b, c));
        assert_eq!(s.document_position(b, c), Ordering::Less);
        assert_eq!(s.document_position(c, b), Ordering::Greater);
        assert_eq!(s.document_position(a, c), Ordering::Less);
        assert!(s.has_own_text(a));
        assert!(!s.has_own_text(s.root().unwrap()));
    }

    #[test]
    fn html_parent_is_topmost() {
        let s = snapshot("<p>x</p>");
        let root = s.root().unwrap();
        let html = s.parent(root).unwrap();
        assert_eq!(s.tag_name(html), "html");
        assert_eq!(s.parent(html), None);
    }

    #[test]
    fn query_excludes_scope() {
        let s = snapshot("<div id=a><div id=b></div></div>");
        let a = first(&s, "#a");
        assert_eq!(s.query_all(a, "div"), vec![first(&s, "#b")]);
    }

    #[test]
    fn geometry_from_inline_styles() {
        let s = snapshot(
            r#"<div id=row style="position:absolute;left:10px;top:200px;width:600px;height:120px">
                 <img id=img style="width:80px;height:80px">
               </div>"#,
        );
        assert_eq!(s.bounding_rect(first(&s, "#row")), Rect::new(10.0, 200.0, 600.0, 120.0));
        assert_eq!(s.offset_size(first(&s, "#img")), (80.0, 80.0));
    }

    #[test]
    fn hidden_elements_have_no_box() {
        let s = snapshot(r#"<div id=h style="display:none;width:50px;height:50px">x</div>"#);
        let h = first(&s, "#h");
        assert_eq!(s.style(h).display, Display::None);
        assert_eq!(s.offset_size(h), (0.0, 0.0));
        assert_eq!(s.inner_text(h), "");
        assert_eq!(s.text_content(h), "x");
    }

    #[test]
    fn from_bytes_detects_charset() {
        let bytes = b"<meta charset=\"iso-8859-1\"><p id=p>Caf\xe9</p>";
        let s = HtmlSnapshot::from_bytes(bytes, PAGE).unwrap();
        assert_eq!(s.inner_text(first(&s, "#p")), "Caf\u{e9}");
    }

    #[test]
    fn outer_html_includes_attributes() {
        let s = snapshot(r#"<a id=l href="/p/1" data-sku="42">Mug</a>"#);
        let html = s.outer_html(first(&s, "#l"));
        assert!(html.contains("data-sku=\"42\""));
        assert!(html.starts_with("<a"));
    }
}
