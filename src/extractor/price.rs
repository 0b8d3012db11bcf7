//! Price extraction.
//!
//! Scans the row for elements whose whole text is a price, drops struck-out
//! "was" prices and wrappers that merely repeat a child, then ranks what is
//! left: promotional wording first, per-unit prices last, otherwise the
//! smallest amount.

use std::cmp::Ordering;

use tracing::trace;

use crate::patterns::{
    CENTS, CURRENCY_WIDGET_SELECTOR, PRICE_AMOUNT, PRICE_FULL, PRICE_PER_UNIT, PRICE_PREFERRED,
    PRICE_QUALIFIER, PRICE_SELECTOR, PRICE_UNIT_SUFFIX,
};
use crate::site::SiteOverride;
use crate::tree::VisualTree;

/// Display price of the row with qualifier words removed.
pub(crate) fn extract_price<T: VisualTree>(tree: &T, node: T::Node, site: &SiteOverride) -> Option<String> {
    if site.price_excluded {
        return None;
    }

    if let Some(widget) = tree.query_first(node, CURRENCY_WIDGET_SELECTOR) {
        let text = tree.inner_text(widget).trim().to_string();
        if text.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(format!("${text}"));
        }
        if !text.is_empty() {
            return Some(text);
        }
    }

    let mut best: Option<String> = None;
    for candidate in tree.query_all(node, PRICE_SELECTOR) {
        let Some(text) = price_text(tree, candidate, site) else {
            continue;
        };
        if best.as_deref().is_none_or(|current| rank(&text, current) == Ordering::Less) {
            best = Some(text);
        }
    }

    let price = best.map(|text| strip_qualifiers(&text))?;
    trace!(?node, %price, "price");
    Some(price)
}

/// Price text of one element, or `None` if it is not a usable price.
fn price_text<T: VisualTree>(tree: &T, node: T::Node, site: &SiteOverride) -> Option<String> {
    let inner = tree.inner_text(node);
    let text = match site.price_line {
        Some(line) => inner.lines().nth(line)?.trim().to_string(),
        None => inner.trim().to_string(),
    };
    if !PRICE_FULL.is_match(&text) {
        return None;
    }

    let children = tree.children(node);
    let echoes = [children.first(), children.last()]
        .into_iter()
        .flatten()
        .any(|&child| is_price_tag(&tree.tag_name(child)) && tree.inner_text(child).trim() == text);
    if echoes {
        return None;
    }

    if is_struck_through(tree, node) {
        trace!(?node, %text, "struck-through price");
        return None;
    }

    if !text.contains('.') {
        if let Some(cents) = detached_cents(tree, node) {
            return Some(format!("{text}.{cents}"));
        }
    }
    Some(text)
}

fn is_price_tag(tag: &str) -> bool {
    PRICE_SELECTOR.split(", ").any(|t| t == tag)
}

/// Line-through on the element, its parent or its grandparent.
fn is_struck_through<T: VisualTree>(tree: &T, node: T::Node) -> bool {
    std::iter::once(node)
        .chain(tree.ancestors(node, 2))
        .any(|n| tree.style(n).line_through)
}

/// Cents rendered as the parent's last child (`<span>$12</span><sup>99</sup>`).
fn detached_cents<T: VisualTree>(tree: &T, node: T::Node) -> Option<String> {
    let parent = tree.parent(node)?;
    let last = tree.children(parent).last().copied()?;
    if last == node {
        return None;
    }
    let cents = tree.inner_text(last).trim().to_string();
    CENTS.is_match(&cents).then_some(cents)
}

/// `Less` when `a` is the better price.
fn rank(a: &str, b: &str) -> Ordering {
    let preferred = |s: &str| PRICE_PREFERRED.is_match(s);
    let per_unit = |s: &str| PRICE_PER_UNIT.is_match(s);

    preferred(b)
        .cmp(&preferred(a))
        .then_with(|| per_unit(a).cmp(&per_unit(b)))
        .then_with(|| amount(a).total_cmp(&amount(b)))
}

/// First dollar amount of a price text; unparsable texts rank last.
fn amount(text: &str) -> f64 {
    let stripped = PRICE_QUALIFIER.replace(text, "");
    PRICE_AMOUNT
        .captures(&stripped)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(f64::INFINITY)
}

fn strip_qualifiers(text: &str) -> String {
    let text = PRICE_QUALIFIER.replace(text, "");
    PRICE_UNIT_SUFFIX.replace(&text, "").trim().to_string()
}
