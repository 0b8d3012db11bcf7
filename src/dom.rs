//! DOM helpers over `dom_query`.
//!
//! Small adapters used by the snapshot tree: tag and attribute access on
//! `NodeRef`s, element-only child iteration and the rendering categories
//! (block, non-rendered, strikethrough) the layout pass needs.

pub use dom_query::{Document, NodeId, NodeRef, Selection};

/// Tags that never render, along with their subtree.
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "noscript", "title", "meta", "link", "base",
];

/// Tags the UA stylesheet lays out as blocks (or table parts, which break
/// lines the same way for inner text).
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Tags the UA stylesheet draws with `text-decoration: line-through`.
const STRIKE_TAGS: &[&str] = &["s", "strike", "del"];

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Lowercase tag name, `None` for non-element nodes.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_string().to_ascii_lowercase())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Element children in document order.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children().into_iter().filter(NodeRef::is_element).collect()
}

/// True if a direct text child carries non-whitespace text.
#[must_use]
pub fn has_own_text(node: &NodeRef) -> bool {
    node.children()
        .iter()
        .any(|child| child.is_text() && !child.text().trim().is_empty())
}

#[inline]
#[must_use]
pub fn is_non_rendered_tag(tag: &str) -> bool {
    NON_RENDERED_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_strike_tag(tag: &str) -> bool {
    STRIKE_TAGS.contains(&tag)
}

/// Split an inline `style` attribute into lowercase `(property, value)` pairs.
#[must_use]
pub fn style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            if prop.is_empty() {
                return None;
            }
            Some((prop, value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Document, selector: &str) -> NodeRef<'a> {
        *doc.select(selector).nodes().first().unwrap()
    }

    #[test]
    fn test_tag_name_lowercase() {
        let doc = parse(r#"<DIV id="a">x</DIV>"#);
        assert_eq!(tag_name(&first(&doc, "#a")), Some("div".to_string()));
    }

    #[test]
    fn test_element_children_skip_text() {
        let doc = parse(r#"<ul id="l"> a <li>1</li> b <li>2</li></ul>"#);
        let kids = element_children(&first(&doc, "#l"));
        assert_eq!(kids.len(), 2);
    }

    #[test]
    fn test_has_own_text() {
        let doc = parse(r#"<div id="w"> <span id="s">Blue Mug</span> </div>"#);
        assert!(!has_own_text(&first(&doc, "#w")));
        assert!(has_own_text(&first(&doc, "#s")));
    }

    #[test]
    fn test_style_declarations() {
        let decls = style_declarations("Height: 80px; display:none;;bogus");
        assert_eq!(
            decls,
            vec![
                ("height".to_string(), "80px".to_string()),
                ("display".to_string(), "none".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_attribute_is_none() {
        let doc = parse(r#"<div id="a">no attributes</div>"#);
        assert_eq!(get_attribute(&first(&doc, "#a"), "data-src"), None);
    }

    #[test]
    fn test_tag_categories() {
        assert!(is_block_tag("div"));
        assert!(!is_block_tag("span"));
        assert!(is_non_rendered_tag("script"));
        assert!(is_strike_tag("del"));
    }
}
