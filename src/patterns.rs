//! Compiled regex patterns and CSS selectors for cart extraction.
//!
//! All patterns are compiled once at first use using `LazyLock`.
//! Patterns are organized by the pipeline stage that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Item Classification Patterns
// =============================================================================

/// Recommendation widgets offering to move saved items into the cart.
pub static MOVE_TO_CART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)move to (?:cart|bag)").expect("MOVE_TO_CART regex"));

/// Tax and shipping estimate rows of the order summary.
pub static TAX_ESTIMATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:estimated|est\.)\s+(?:sales\s+)?(?:tax|shipping)\b|\b(?:tax|shipping)\s+(?:estimate|to be calculated)\b",
    )
    .expect("TAX_ESTIMATE regex")
});

pub static ADD_TO_CART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)add to (?:cart|bag|basket)").expect("ADD_TO_CART regex")
});

/// Header flyout carts that mirror the real cart.
pub static MINI_CART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mini-?cart").expect("MINI_CART regex"));

pub static QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)qty|quantity").expect("QUANTITY regex"));

/// Per-row actions only real cart lines offer. Unanchored: inner text glues
/// adjacent inline elements together (`$12.99Remove`).
pub static CART_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)remove|delete|saved? for later|move to (?:wish ?list|list|favorites)|wish ?list",
    )
    .expect("CART_ACTION regex")
});

/// Cart-ish class names anywhere in the markup.
pub static CART_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class\s*=\s*["'][^"']*(?:cart|basket|bundle-item)"#).expect("CART_CLASS regex")
});

/// Heading of the saved-for-later section, e.g. "Saved for later (3 items)".
pub static SAVED_FOR_LATER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*saved? for later(?:\s*\(\s*\d+(?:\s+items?)?\s*\))?\s*$")
        .expect("SAVED_FOR_LATER_LABEL regex")
});

// =============================================================================
// Field Extraction Patterns
// =============================================================================

/// Ancestor class/id names that indicate a title.
pub static TITLE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)title|name|brand").expect("TITLE_CLASS regex"));

/// Ancestor class/id names that look like a title but hold something else.
pub static TITLE_PENALTY_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)price|model").expect("TITLE_PENALTY_CLASS regex"));

/// Full price text: qualifier, multiplier, currency, amount, range, unit.
pub static PRICE_FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:sale|now|with offer|regular|reg\.?|our price|your price|price)\s*:?\s*)?(?:\d+\s*/\s*)?(?:US|USD)?\s*\$\s?\d[\d,]*(?:\.\d{1,2})?(?:\s*(?:to|-|–)\s*(?:US|USD)?\s*\$?\s?\d[\d,]*(?:\.\d{1,2})?)?(?:\s*/\s*(?:each|set|ea))?(?:\s*ea\.?)?$",
    )
    .expect("PRICE_FULL regex")
});

/// Any dollar amount, for the cheap candidate pre-filter.
pub static PRICE_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s?\d").expect("PRICE_ANYWHERE regex"));

pub static PRICE_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:sale|now|with offer|regular|reg\.?|our price|your price|price)\s*:?\s*")
        .expect("PRICE_QUALIFIER regex")
});

pub static PRICE_UNIT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s*/\s*(?:each|set|ea))?(?:\s*ea\.?)?\s*$").expect("PRICE_UNIT_SUFFIX regex")
});

/// Promotional wording that marks the price actually charged.
pub static PRICE_PREFERRED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)with offer|\bsale\b|\bnow\b").expect("PRICE_PREFERRED regex")
});

/// Per-unit prices that are not the line total.
pub static PRICE_PER_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/\s*(?:set|each)").expect("PRICE_PER_UNIT regex"));

pub static PRICE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s?(\d[\d,]*(?:\.\d+)?)").expect("PRICE_AMOUNT regex")
});

/// Bare cents rendered in their own element (`<sup>99</sup>`).
pub static CENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}$").expect("CENTS regex"));

/// `url(...)` inside an inline background style.
pub static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*["']?([^"')\s]+)["']?\s*\)"#).expect("BACKGROUND_URL regex")
});

/// Class names of image elements that carry the picture as an inline background.
pub static BACKGROUND_IMAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bg-image|background-image|image-bg|img-bg|lazy-bg)\b")
        .expect("BACKGROUND_IMAGE_CLASS regex")
});

// =============================================================================
// CSS Selectors
// =============================================================================

pub const LINK_SELECTOR: &str = "a";

pub const IMAGE_SELECTOR: &str = "img";

/// Elements whose own text may be a product title.
pub const TITLE_SELECTOR: &str = "a, span, p, div, h1, h2, h3, h4, h5, h6, strong, b, em, label";

/// Elements whose text may be a price.
pub const PRICE_SELECTOR: &str = "span, p, div, b, strong, em, ins, td, dd, h2, h3, h4, h5, h6";

/// Currency widget of a known mobile cart layout.
pub const CURRENCY_WIDGET_SELECTOR: &str = "[class*='currency-value']";

/// Elements that may hold the saved-for-later heading.
pub const SAVED_FOR_LATER_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, div, span, p";

/// Lazy-load attributes, in precedence order.
pub const LAZY_IMAGE_ATTRIBUTES: &[&str] =
    &["data-src", "data-img-url", "data-config-src", "data-echo", "data-lazy"];
