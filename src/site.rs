//! Per-host override policy.
//!
//! A few shops defeat the generic heuristics in narrow, well-understood ways.
//! Every host-specific behavior lives in one `SiteOverride` record so each
//! pipeline stage consults the table once instead of testing hostnames
//! inline.

use serde::{Deserialize, Serialize};

use crate::url_utils;
use crate::Result;

/// Host-specific adjustments to the extraction pipeline.
///
/// The default value means "no overrides": generic candidate discovery and
/// all heuristics enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct SiteOverride {
    /// Selector yielding trusted cart item containers (narrow mode).
    pub item_selector: Option<String>,

    /// "Add to cart" legitimately appears inside real cart rows.
    pub allow_add_to_cart: bool,

    /// The "move to cart" prompt sits just outside the row, on its parent.
    pub move_to_cart_on_parent: bool,

    /// Reject candidates whose markup mentions the mini-cart.
    pub reject_mini_cart: bool,

    /// Reject candidates without a quantity marker.
    pub require_quantity: bool,

    /// Element whose inline background is the product image.
    pub background_image_selector: Option<String>,

    /// Rows legitimately carry several product images.
    pub multi_image: bool,

    /// Cart rows have no usable link (side-panel navigation).
    pub url_excluded: bool,

    /// Attribute holding the real link target on anchors.
    pub url_attribute: Option<String>,

    /// Prices are rendered one digit per element.
    pub price_excluded: bool,

    /// Price texts span several lines; only this line holds the price.
    pub price_line: Option<usize>,

    /// Candidates starting within this many pixels of the page top are headers.
    pub header_band: Option<f64>,

    /// The same item is rendered twice; keep the first per URL.
    pub dedup_by_url: bool,
}

impl SiteOverride {
    /// Narrow mode: candidates come straight from `item_selector`.
    #[must_use]
    pub fn is_narrow(&self) -> bool {
        self.item_selector.is_some()
    }
}

/// Hostname → override lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteOverrides {
    entries: Vec<(String, SiteOverride)>,
}

impl SiteOverrides {
    /// Table with no overrides at all.
    #[must_use]
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// The overrides shipped with the crate.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::empty();

        for host in ["homedepot.com", "staples.com"] {
            table.update(host, |o| o.allow_add_to_cart = true);
        }
        table.update("target.com", |o| {
            o.move_to_cart_on_parent = true;
            o.dedup_by_url = true;
        });
        for host in ["macys.com", "kohls.com"] {
            table.update(host, |o| o.reject_mini_cart = true);
        }
        table.update("costco.com", |o| o.require_quantity = true);
        table.update("wayfair.com", |o| {
            o.background_image_selector = Some("[style*='background-image']".to_string());
        });
        table.update("zappos.com", |o| {
            o.background_image_selector = Some("[class*='product-image']".to_string());
        });
        for host in ["amazon.com", "ebay.com", "bestbuy.com"] {
            table.update(host, |o| o.multi_image = true);
        }
        for host in ["instacart.com", "freshdirect.com", "shipt.com", "peapod.com"] {
            table.update(host, |o| o.url_excluded = true);
        }
        table.update("lowes.com", |o| o.url_attribute = Some("data-url".to_string()));
        table.update("newegg.com", |o| o.price_excluded = true);
        table.update("gap.com", |o| o.price_line = Some(0));
        table.update("bananarepublic.com", |o| o.price_line = Some(1));
        table.update("walmart.com", |o| o.header_band = Some(100.0));
        table.update("ebay.com", |o| {
            o.item_selector = Some(".cart-bucket-lineitem".to_string());
        });
        table.update("etsy.com", |o| {
            o.item_selector = Some("[data-cart-listing]".to_string());
        });

        table
    }

    /// Edit the record for `host`, creating it if needed.
    pub fn update(&mut self, host: &str, edit: impl FnOnce(&mut SiteOverride)) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| key == host) {
            edit(existing);
        } else {
            let mut record = SiteOverride::default();
            edit(&mut record);
            self.entries.push((host.to_string(), record));
        }
    }

    /// Replace the record for `host`.
    pub fn insert(&mut self, host: &str, record: SiteOverride) {
        self.update(host, |existing| *existing = record);
    }

    /// Add or replace records from a `{"host": {...}}` JSON object.
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let records: std::collections::BTreeMap<String, SiteOverride> = serde_json::from_str(json)?;
        for (host, record) in records {
            self.insert(&host, record);
        }
        Ok(())
    }

    /// Overrides for a page host; the first matching key wins.
    #[must_use]
    pub fn lookup(&self, host: &str) -> SiteOverride {
        self.entries
            .iter()
            .find(|(key, _)| url_utils::host_matches(host, key))
            .map(|(_, record)| record.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SiteOverrides {
    fn default() -> Self {
        Self::builtin()
    }
}
