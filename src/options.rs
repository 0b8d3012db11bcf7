//! Configuration options for cart extraction.
//!
//! The host page used to predefine tuning knobs as globals before invoking
//! the extractor. They are gathered here into one explicit struct; hosts
//! that still speak the old knob names can hand them over as JSON through
//! [`Options::from_host_json`].

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::extractor::product_id::{IdRule, ProductIdTable};
use crate::site::SiteOverrides;
use crate::Result;

/// Configuration options for one extraction run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rs_cart_extraction::Options;
///
/// let options = Options {
///     timeout: Duration::from_millis(500),
///     improvement_enabled: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Budget of synchronous work time (not wall-clock) for the scan.
    ///
    /// Default: `250ms`
    pub timeout: Duration,

    /// Work slices shorter than this never yield.
    ///
    /// Default: `10ms`
    pub min_task_time: Duration,

    /// Target fraction of wall-clock time spent working, clamped to
    /// `[0.01, 1.0]` by the scheduler.
    ///
    /// Default: `0.05`
    pub duty_cycle: f64,

    /// Exclude items rendered below a "saved for later" heading.
    ///
    /// Default: `false`
    pub improvement_enabled: bool,

    /// The host reports the page as fully loaded. When the scan root is
    /// missing this decides between an empty result and "not ready yet".
    ///
    /// Default: `true`
    pub document_complete: bool,

    /// Hostname → product id patterns.
    ///
    /// Default: `None` (product ids are not extracted)
    pub product_ids: Option<ProductIdTable>,

    /// Secondary id patterns, consulted when `product_ids` has no entry for
    /// the page host.
    ///
    /// Default: `None`
    pub coupon_ids: Option<ProductIdTable>,

    /// Per-host override policy.
    ///
    /// Default: [`SiteOverrides::builtin`]
    pub sites: SiteOverrides,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(250),
            min_task_time: Duration::from_millis(10),
            duty_cycle: 0.05,
            improvement_enabled: false,
            document_complete: true,
            product_ids: None,
            coupon_ids: None,
            sites: SiteOverrides::builtin(),
        }
    }
}

/// Knobs as the host page predefines them.
#[derive(Debug, Default, Deserialize)]
struct HostKnobs {
    #[serde(rename = "kTimeoutMs")]
    timeout_ms: Option<f64>,
    #[serde(rename = "kSleeperMinTaskTimeMs")]
    min_task_time_ms: Option<f64>,
    #[serde(rename = "kSleeperDutyCycle")]
    duty_cycle: Option<f64>,
    #[serde(rename = "isImprovementEnabled")]
    improvement_enabled: Option<bool>,
    #[serde(rename = "idExtractionMap")]
    id_extraction_map: Option<BTreeMap<String, IdRule>>,
    #[serde(rename = "couponIdExtractionMap")]
    coupon_id_extraction_map: Option<BTreeMap<String, IdRule>>,
}

impl Options {
    /// Build options from the host's predefined knobs.
    ///
    /// Missing knobs keep their defaults. Id maps are compiled eagerly, so a
    /// bad pattern is reported here rather than silently skipped later.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use rs_cart_extraction::Options;
    ///
    /// let options = Options::from_host_json(
    ///     r#"{"kTimeoutMs": 400, "idExtractionMap": {"shop.example": "/p/(\\d+)"}}"#,
    /// )?;
    /// assert_eq!(options.timeout, Duration::from_millis(400));
    /// assert!(options.product_ids.is_some());
    /// # Ok::<(), rs_cart_extraction::Error>(())
    /// ```
    pub fn from_host_json(json: &str) -> Result<Self> {
        let knobs: HostKnobs = serde_json::from_str(json)?;
        let mut options = Self::default();

        if let Some(timeout) = knobs.timeout_ms.and_then(millis) {
            options.timeout = timeout;
        }
        if let Some(min_task) = knobs.min_task_time_ms.and_then(millis) {
            options.min_task_time = min_task;
        }
        if let Some(duty_cycle) = knobs.duty_cycle.filter(|d| d.is_finite()) {
            options.duty_cycle = duty_cycle;
        }
        if let Some(enabled) = knobs.improvement_enabled {
            options.improvement_enabled = enabled;
        }
        if let Some(rules) = knobs.id_extraction_map {
            options.product_ids = Some(ProductIdTable::from_rules(rules)?);
        }
        if let Some(rules) = knobs.coupon_id_extraction_map {
            options.coupon_ids = Some(ProductIdTable::from_rules(rules)?);
        }

        Ok(options)
    }
}

/// Milliseconds as a `Duration`; negative, non-finite or out-of-range values
/// are ignored.
fn millis(ms: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(ms / 1000.0).ok()
}
