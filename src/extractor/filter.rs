//! Geometry and visibility filter.

use tracing::trace;

use crate::extractor::state::ExtractionState;
use crate::patterns::{IMAGE_SELECTOR, PRICE_ANYWHERE};
use crate::site::SiteOverride;
use crate::tree::{Display, VisualTree};

/// Taller than this is several rows, not one.
const MAX_ITEM_HEIGHT: f64 = 1000.0;

/// Shorter than this is a text line, not a product tile.
const MIN_ITEM_HEIGHT: f64 = 50.0;

/// Area limit in units of viewport width; catches page wrappers.
const MAX_AREA_PER_VIEWPORT_WIDTH: f64 = 800.0;

/// Run the filter and record the node as processed when it passes.
pub(crate) fn admit<T: VisualTree>(
    tree: &T,
    node: T::Node,
    state: &mut ExtractionState<T::Node>,
    site: &SiteOverride,
) -> bool {
    if let Some(reason) = rejection(tree, node, state, site) {
        trace!(?node, reason, "filtered");
        return false;
    }
    state.mark_done(node);
    true
}

/// Why `node` is not real item content, if it is not.
///
/// Narrow-mode candidates are trusted containers: only the processed-set and
/// rendered-at-all checks apply to them.
pub(crate) fn rejection<T: VisualTree>(
    tree: &T,
    node: T::Node,
    state: &ExtractionState<T::Node>,
    site: &SiteOverride,
) -> Option<&'static str> {
    if state.is_done(node) {
        return Some("already processed");
    }

    let (width, height) = tree.offset_size(node);
    let style = tree.style(node);
    if width <= 0.0 || height <= 0.0 || style.display == Display::None || !style.visible {
        return Some("not rendered");
    }
    if site.is_narrow() {
        return None;
    }

    if height > MAX_ITEM_HEIGHT {
        return Some("too tall");
    }
    let rect = tree.bounding_rect(node);
    if rect.height < MIN_ITEM_HEIGHT {
        return Some("too short");
    }
    if rect.area() > MAX_AREA_PER_VIEWPORT_WIDTH * tree.viewport_width() {
        return Some("too large");
    }

    let has_image = tree.query_first(node, IMAGE_SELECTOR).is_some()
        || site
            .background_image_selector
            .as_deref()
            .is_some_and(|selector| tree.query_first(node, selector).is_some());
    if !has_image {
        return Some("no image");
    }

    if !PRICE_ANYWHERE.is_match(&tree.inner_text(node)) {
        return Some("no price text");
    }

    if site.header_band.is_some_and(|band| rect.y < band) {
        return Some("page header");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::HtmlSnapshot;

    const ROW: &str = r#"<div id=row style="width:600px;height:120px"><img style="width:80px;height:80px"><span>$12.99</span></div>"#;

    fn check(html: &str, site: &SiteOverride) -> Option<&'static str> {
        let s = HtmlSnapshot::parse(html, "https://shop.example/cart").unwrap();
        let row = s.query_first(s.root().unwrap(), "#row").unwrap();
        rejection(&s, row, &ExtractionState::new(), site)
    }

    fn generic(html: &str) -> Option<&'static str> {
        check(html, &SiteOverride::default())
    }

    #[test]
    fn test_plausible_row_passes() {
        assert_eq!(generic(ROW), None);
    }

    #[test]
    fn test_admit_marks_processed_once() {
        let s = HtmlSnapshot::parse(ROW, "https://shop.example/cart").unwrap();
        let row = s.query_first(s.root().unwrap(), "#row").unwrap();
        let mut state = ExtractionState::new();
        let site = SiteOverride::default();
        assert!(admit(&s, row, &mut state, &site));
        assert!(state.is_done(row));
        assert!(!admit(&s, row, &mut state, &site));
    }

    #[test]
    fn test_rejected_node_is_not_marked() {
        let s = HtmlSnapshot::parse("<div id=row>no box</div>", "https://shop.example/cart").unwrap();
        let row = s.query_first(s.root().unwrap(), "#row").unwrap();
        let mut state = ExtractionState::new();
        admit(&s, row, &mut state, &SiteOverride::default());
        assert!(!state.is_done(row));
    }

    #[test]
    fn test_geometry_limits() {
        assert_eq!(generic(&ROW.replace("height:120px", "height:1200px")), Some("too tall"));
        assert_eq!(generic(&ROW.replace("height:120px", "height:40px")), Some("too short"));
        assert_eq!(
            generic(&ROW.replace("width:600px;height:120px", "width:1280px;height:900px")),
            Some("too large")
        );
    }

    #[test]
    fn test_hidden_row_rejected() {
        assert_eq!(generic(&ROW.replace("width:600px", "visibility:hidden;width:600px")), Some("not rendered"));
        assert_eq!(generic(&ROW.replace("width:600px", "display:none;width:600px")), Some("not rendered"));
    }

    #[test]
    fn test_content_prefilters() {
        assert_eq!(generic(&ROW.replace("<img style=\"width:80px;height:80px\">", "")), Some("no image"));
        assert_eq!(generic(&ROW.replace("$12.99", "12.99")), Some("no price text"));
    }

    #[test]
    fn test_background_image_counts_as_image() {
        let html = r#"<div id=row style="width:600px;height:120px"><div class=pic style="width:80px;height:80px"></div><span>$12.99</span></div>"#;
        let site = SiteOverride {
            background_image_selector: Some(".pic".to_string()),
            ..SiteOverride::default()
        };
        assert_eq!(check(html, &site), None);
        assert_eq!(generic(html), Some("no image"));
    }

    #[test]
    fn test_header_band() {
        let site = SiteOverride {
            header_band: Some(100.0),
            ..SiteOverride::default()
        };
        assert_eq!(check(ROW, &site), Some("page header"));
        let lower = ROW.replace("width:600px", "position:absolute;left:0;top:300px;width:600px");
        assert_eq!(check(&lower, &site), None);
    }

    #[test]
    fn test_narrow_mode_skips_heuristics() {
        let site = SiteOverride {
            item_selector: Some("#row".to_string()),
            ..SiteOverride::default()
        };
        let html = r#"<div id=row style="width:600px;height:20px">no price</div>"#;
        assert_eq!(check(html, &site), None);
    }
}
