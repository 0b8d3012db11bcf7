//! Item classification.
//!
//! Negative patterns first (recommendation widgets, order summary rows,
//! mini-carts); a survivor still needs one positive cart signal.

use tracing::trace;

use crate::patterns::{
    ADD_TO_CART, CART_ACTION, CART_CLASS, MINI_CART, MOVE_TO_CART, QUANTITY, SAVED_FOR_LATER_LABEL,
    SAVED_FOR_LATER_SELECTOR, TAX_ESTIMATE,
};
use crate::site::SiteOverride;
use crate::tree::VisualTree;

/// Whether `node` plausibly is one cart line item.
pub(crate) fn is_cart_item<T: VisualTree>(tree: &T, node: T::Node, site: &SiteOverride) -> bool {
    match verdict(tree, node, site) {
        Ok(signal) => {
            trace!(?node, signal, "cart item");
            true
        }
        Err(reason) => {
            trace!(?node, reason, "not a cart item");
            false
        }
    }
}

/// The positive signal that classified the node, or the reason it was
/// turned down.
fn verdict<T: VisualTree>(
    tree: &T,
    node: T::Node,
    site: &SiteOverride,
) -> Result<&'static str, &'static str> {
    let text = tree.inner_text(node);

    if MOVE_TO_CART.is_match(&text) {
        return Err("move to cart");
    }
    if site.move_to_cart_on_parent
        && tree
            .parent(node)
            .is_some_and(|parent| MOVE_TO_CART.is_match(&tree.inner_text(parent)))
    {
        return Err("move to cart on parent");
    }
    if TAX_ESTIMATE.is_match(&text) {
        return Err("tax estimate");
    }
    if !site.allow_add_to_cart && ADD_TO_CART.is_match(&text) {
        return Err("add to cart");
    }

    let quantity = QUANTITY.is_match(&text);
    if site.require_quantity && !quantity {
        return Err("no quantity");
    }

    let mut markup = None;
    if site.reject_mini_cart {
        let html = markup.insert(tree.outer_html(node));
        if MINI_CART.is_match(html) {
            return Err("mini cart");
        }
    }

    if CART_ACTION.is_match(&text) {
        return Ok("cart action");
    }
    if quantity {
        return Ok("quantity");
    }
    let html = markup.get_or_insert_with(|| tree.outer_html(node));
    if CART_CLASS.is_match(html) {
        return Ok("cart class");
    }
    Err("no cart signal")
}

/// Top edge of the saved-for-later heading, if the page has one.
pub(crate) fn saved_for_later_top<T: VisualTree>(tree: &T, root: T::Node) -> Option<f64> {
    tree.query_all(root, SAVED_FOR_LATER_SELECTOR)
        .into_iter()
        .find(|&node| {
            !tree.bounding_rect(node).is_empty() && SAVED_FOR_LATER_LABEL.is_match(&tree.inner_text(node))
        })
        .map(|node| tree.bounding_rect(node).y)
}

/// Whether `node` sits below the saved-for-later heading at `top`. The
/// heading itself is not counted as saved.
pub(crate) fn is_saved_for_later<T: VisualTree>(tree: &T, node: T::Node, top: f64) -> bool {
    tree.bounding_rect(node).y > top && !SAVED_FOR_LATER_LABEL.is_match(&tree.inner_text(node))
}
