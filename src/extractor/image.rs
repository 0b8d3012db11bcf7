//! Product image extraction.

use tracing::trace;

use crate::patterns::{BACKGROUND_IMAGE_CLASS, BACKGROUND_URL, IMAGE_SELECTOR, LAZY_IMAGE_ATTRIBUTES};
use crate::site::SiteOverride;
use crate::tree::VisualTree;
use crate::url_utils::{create_absolute_url, first_srcset_url, is_data_url, normalize_lazy_url};

/// Rendered height of a real product image.
const MIN_IMAGE_HEIGHT: f64 = 40.0;

/// Relaxed height for images that look lazy-loaded or decorative-wrapped.
const MIN_PLAUSIBLE_IMAGE_HEIGHT: f64 = 30.0;

/// Absolute URL of the row's product image.
pub(crate) fn extract_image<T: VisualTree>(tree: &T, node: T::Node, site: &SiteOverride) -> Option<String> {
    if let Some(selector) = &site.background_image_selector {
        let element = tree.query_first(node, selector)?;
        return background_url(tree, element);
    }

    let images = tree.query_all(node, IMAGE_SELECTOR);
    let mut sized: Vec<T::Node> = images
        .iter()
        .copied()
        .filter(|&img| tree.offset_size(img).1 >= MIN_IMAGE_HEIGHT)
        .collect();
    if sized.is_empty() {
        sized = images
            .into_iter()
            .filter(|&img| tree.offset_size(img).1 >= MIN_PLAUSIBLE_IMAGE_HEIGHT && is_plausible(tree, img))
            .collect();
    }

    if !site.multi_image && sized.len() != 1 {
        trace!(?node, count = sized.len(), "ambiguous image count");
        return None;
    }
    sized.into_iter().find_map(|img| image_source(tree, img))
}

/// Hints that a small image lost its real dimensions in the snapshot.
fn is_plausible<T: VisualTree>(tree: &T, img: T::Node) -> bool {
    tree.attr(img, "aria-hidden").is_some()
        || tree.attr(img, "loading").is_some_and(|v| v.eq_ignore_ascii_case("lazy"))
        || LAZY_IMAGE_ATTRIBUTES.iter().any(|attr| tree.attr(img, attr).is_some())
        || tree.parent(img).is_some_and(|p| tree.tag_name(p) == "picture")
}

/// Source URL of one image element.
///
/// Precedence: lazy-load attribute, inline background of a known class,
/// `src`, then `srcset` or the enclosing `<picture>`'s first `<source>`.
/// A `data:` URI is used only when nothing else resolves.
pub(crate) fn image_source<T: VisualTree>(tree: &T, img: T::Node) -> Option<String> {
    let lazy = LAZY_IMAGE_ATTRIBUTES
        .iter()
        .filter_map(|attr| tree.attr(img, attr))
        .find_map(|value| normalize_lazy_url(&value));
    if lazy.is_some() {
        return lazy;
    }

    let class = tree.attr(img, "class").unwrap_or_default();
    if BACKGROUND_IMAGE_CLASS.is_match(&class) {
        if let Some(url) = background_url(tree, img) {
            return Some(url);
        }
    }

    let src = tree.attr(img, "src").filter(|s| !s.trim().is_empty());
    if let Some(url) = src
        .as_deref()
        .filter(|s| !is_data_url(s))
        .and_then(|s| create_absolute_url(s, tree.page_url()))
    {
        return Some(url);
    }

    let srcset = tree.attr(img, "srcset").or_else(|| {
        tree.parent(img)
            .filter(|&p| tree.tag_name(p) == "picture")
            .and_then(|picture| tree.query_first(picture, "source"))
            .and_then(|source| tree.attr(source, "srcset"))
    });
    if let Some(url) = srcset
        .as_deref()
        .and_then(first_srcset_url)
        .and_then(|s| create_absolute_url(s, tree.page_url()))
    {
        return Some(url);
    }

    src.filter(|s| is_data_url(s)).map(|s| s.trim().to_string())
}

/// URL of an inline `background-image`, resolved against the page.
fn background_url<T: VisualTree>(tree: &T, element: T::Node) -> Option<String> {
    let style = tree.attr(element, "style")?;
    let raw = BACKGROUND_URL.captures(&style)?.get(1)?.as_str().to_string();
    create_absolute_url(&raw, tree.page_url())
}
