//! Extraction pipeline.
//!
//! Orchestrates one scan: candidate generation, the budget-checked candidate
//! loop (filter, classify, overlap, fields) and the final document-order
//! sort.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::options::Options;
use crate::result::{ExtractedItem, Extraction, ExtractionResult};
use crate::site::SiteOverride;
use crate::sleeper::Sleeper;
use crate::tree::VisualTree;

use super::classify::{is_cart_item, is_saved_for_later, saved_for_later_top};
use super::state::ExtractionState;
use super::{candidates, filter, image, price, product_id, title, url};

/// Candidates evaluated between two budget checks.
const CHECK_INTERVAL: usize = 10;

/// Per-run context shared by the candidate evaluations.
struct Scan<'a, T: VisualTree> {
    tree: &'a T,
    options: &'a Options,
    site: SiteOverride,
    saved_for_later_top: Option<f64>,
}

/// Extract the cart line items of `tree`.
///
/// Returns [`Extraction::NotReady`] when the scan root is missing and the
/// page is still loading. Otherwise the result holds every item found
/// before the work budget ran out, in document order.
///
/// # Example
///
/// ```rust
/// use rs_cart_extraction::{extract, HtmlSnapshot, Options};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let snapshot = HtmlSnapshot::parse("<p>Your cart is empty</p>", "https://shop.example/cart")?;
/// let result = extract(&snapshot, &Options::default()).await.into_result().unwrap();
/// assert!(result.products.is_empty());
/// # Ok::<(), rs_cart_extraction::Error>(())
/// # }).unwrap();
/// ```
pub async fn extract<T: VisualTree>(tree: &T, options: &Options) -> Extraction {
    let mut sleeper = Sleeper::new(options.min_task_time, options.duty_cycle);

    let Some(root) = tree.root() else {
        if !options.document_complete {
            debug!(url = %tree.page_url(), "scan root missing, page still loading");
            return Extraction::NotReady;
        }
        debug!(url = %tree.page_url(), "scan root missing");
        return Extraction::Ready(telemetry(&sleeper, Vec::new(), false));
    };

    let host = tree.page_url().host_str().unwrap_or_default();
    let site = options.sites.lookup(host);
    let candidates = candidates::generate(tree, root, &site);
    sleeper.maybe_sleep().await;

    let saved_for_later_top = if options.improvement_enabled && !site.is_narrow() {
        saved_for_later_top(tree, root)
    } else {
        None
    };
    let scan = Scan {
        tree,
        options,
        site,
        saved_for_later_top,
    };

    let mut state = ExtractionState::new();
    let mut timed_out = false;
    for (i, &node) in candidates.iter().enumerate() {
        if i > 0 && i % CHECK_INTERVAL == 0 {
            sleeper.maybe_sleep().await;
            if sleeper.total_tasks_time() > options.timeout {
                timed_out = true;
                break;
            }
        }
        if let Some(item) = scan.evaluate(node, &mut state) {
            state.accept(node, item);
        }
    }

    let mut accepted = state.into_accepted();
    accepted.sort_by(|(a, _), (b, _)| tree.document_position(*a, *b));
    let mut products: Vec<ExtractedItem> = accepted.into_iter().map(|(_, item)| item).collect();
    if scan.site.dedup_by_url {
        let mut seen = HashSet::new();
        products.retain(|item| seen.insert(item.url.clone()));
    }

    let mut result = telemetry(&sleeper, products, timed_out);
    // The last partial block of candidates ran without a budget check.
    result.timed_out |= result.total_tasks_ms > millis(options.timeout);

    debug!(
        host,
        candidates = candidates.len(),
        products = result.products.len(),
        timed_out = result.timed_out,
        "extraction finished"
    );
    Extraction::Ready(result)
}

impl<T: VisualTree> Scan<'_, T> {
    /// The candidate's line item, if it is one.
    fn evaluate(&self, node: T::Node, state: &mut ExtractionState<T::Node>) -> Option<ExtractedItem> {
        let tree = self.tree;
        let site = &self.site;

        if !filter::admit(tree, node, state, site) {
            return None;
        }
        if !site.is_narrow() {
            if !is_cart_item(tree, node, site) {
                return None;
            }
            if self
                .saved_for_later_top
                .is_some_and(|top| is_saved_for_later(tree, node, top))
            {
                trace!(?node, "saved for later");
                return None;
            }
        }
        if state.overlaps(tree, node) {
            trace!(?node, "overlaps an accepted item");
            return None;
        }

        let Some(image_url) = image::extract_image(tree, node, site) else {
            trace!(?node, "no image");
            return None;
        };
        let Some(url) = url::extract_url(tree, node, site) else {
            trace!(?node, "no url");
            return None;
        };
        let Some(title) = title::extract_title(tree, node) else {
            trace!(?node, "no title");
            return None;
        };
        let Some(price) = price::extract_price(tree, node, site) else {
            trace!(?node, "no price");
            return None;
        };
        let product_id = product_id::extract_product_id(tree, node, &url, &image_url, self.options);

        debug!(?node, %url, %title, %price, "cart item");
        Some(ExtractedItem {
            url,
            image_url,
            title,
            price,
            product_id,
        })
    }
}

fn telemetry(sleeper: &Sleeper, products: Vec<ExtractedItem>, timed_out: bool) -> ExtractionResult {
    ExtractionResult {
        products,
        longest_task_ms: millis(sleeper.longest_task()),
        total_tasks_ms: millis(sleeper.total_tasks_time()),
        elapsed_ms: millis(sleeper.elapsed()),
        timed_out,
    }
}

fn millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
