//! # rs-cart-extraction
//!
//! Heuristic extraction of shopping-cart line items from rendered pages.
//!
//! Given a cart page of unknown structure, the engine finds the rows that
//! are cart items and pulls out their product URL, image, title, price and
//! (optionally) a shop-specific product id. It relies only on generic
//! signals: geometry, text patterns, ancestor class names and document
//! order, plus a short table of per-host overrides.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_cart_extraction::{extract_html, Options};
//!
//! let html = r#"<div class="cart">
//!   <div style="width:800px;height:120px">
//!     <img src="/img/mug.jpg" width=80 height=80>
//!     <a href="/p/1">Blue Mug</a>
//!     <span>$12.99</span>
//!     <button>Remove</button>
//!   </div>
//! </div>"#;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let result = extract_html(html, "https://shop.example/cart", &Options::default())
//!     .await?
//!     .into_result()
//!     .unwrap();
//! assert_eq!(result.products[0].title, "Blue Mug");
//! assert_eq!(result.products[0].price, "$12.99");
//! # Ok::<(), rs_cart_extraction::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Features
//!
//! - **Any tree**: the engine runs over the [`VisualTree`] trait; [`HtmlSnapshot`]
//!   implements it for serialized pages
//! - **Time budget**: work is sliced cooperatively and bounded by
//!   [`Options::timeout`]; a partial result is still returned
//! - **Host overrides**: [`SiteOverrides`] keeps every per-site exception in
//!   one table

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Cart extraction pipeline (candidates, classifier, field extractors).
pub mod extractor;

/// Per-host override policy.
pub mod site;

/// Cooperative duty-cycle scheduler.
pub mod sleeper;

/// `VisualTree` over parsed HTML snapshots.
pub mod snapshot;

/// Visual tree capability interface.
pub mod tree;

/// URL utilities for resolution and normalization.
pub mod url_utils;

// Public API - re-exports
pub use error::{Error, Result};
pub use extractor::{extract, IdRule, ProductIdTable};
pub use options::Options;
pub use result::{ExtractedItem, Extraction, ExtractionResult};
pub use site::{SiteOverride, SiteOverrides};
pub use snapshot::HtmlSnapshot;
pub use tree::{ComputedStyle, Display, Rect, VisualTree};

/// Extracts cart items from an HTML snapshot.
///
/// # Arguments
///
/// * `html` - The serialized page
/// * `page_url` - URL the page was captured at
/// * `options` - Configuration options for extraction behavior
///
/// # Returns
///
/// Returns `Err` only if `page_url` is not an absolute URL. Extraction
/// itself never fails.
pub async fn extract_html(html: &str, page_url: &str, options: &Options) -> Result<Extraction> {
    let snapshot = HtmlSnapshot::parse(html, page_url)?;
    Ok(extract(&snapshot, options).await)
}

/// Extracts cart items from raw snapshot bytes in any supported encoding.
///
/// See [`extract_html`].
pub async fn extract_bytes(bytes: &[u8], page_url: &str, options: &Options) -> Result<Extraction> {
    let snapshot = HtmlSnapshot::from_bytes(bytes, page_url)?;
    Ok(extract(&snapshot, options).await)
}
