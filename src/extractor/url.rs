//! Product URL extraction.

use crate::patterns::LINK_SELECTOR;
use crate::site::SiteOverride;
use crate::tree::VisualTree;
use crate::url_utils::{create_absolute_url, is_bare_fragment, is_javascript_url};

/// Absolute URL of the product the row links to.
///
/// The first link in document order wins, skipping bare fragments and
/// `javascript:` links. If every link was skipped, the largest one is used
/// anyway.
pub(crate) fn extract_url<T: VisualTree>(tree: &T, node: T::Node, site: &SiteOverride) -> Option<String> {
    if site.url_excluded {
        return None;
    }

    let anchors = if tree.tag_name(node) == "a" {
        vec![node]
    } else {
        tree.query_all(node, LINK_SELECTOR)
    };

    let targets: Vec<(T::Node, Option<String>, Option<String>)> = anchors
        .into_iter()
        .map(|anchor| {
            let raw = site
                .url_attribute
                .as_deref()
                .and_then(|name| tree.attr(anchor, name))
                .or_else(|| tree.attr(anchor, "href"));
            let resolved = raw
                .as_deref()
                .and_then(|raw| create_absolute_url(raw, tree.page_url()));
            (anchor, raw, resolved)
        })
        .collect();

    let usable = targets.iter().find_map(|(_, raw, resolved)| {
        let (raw, resolved) = (raw.as_deref()?, resolved.as_deref()?);
        (!is_bare_fragment(raw, resolved) && !is_javascript_url(raw)).then(|| resolved.to_string())
    });
    if usable.is_some() {
        return usable;
    }

    let mut largest: Option<(f64, &Option<String>)> = None;
    for (anchor, _, resolved) in &targets {
        let area = tree.bounding_rect(*anchor).area();
        if largest.is_none_or(|(best, _)| area > best) {
            largest = Some((area, resolved));
        }
    }
    largest.and_then(|(_, resolved)| resolved.clone())
}
