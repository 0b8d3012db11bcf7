//! Result types for extraction output.
//!
//! Serialized with camelCase keys so the harness can forward the result to
//! its caller without reshaping it.

use serde::{Deserialize, Serialize};

/// One cart line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedItem {
    /// Absolute product page URL.
    pub url: String,

    /// Absolute product image URL.
    pub image_url: String,

    pub title: String,

    /// Price text as displayed, qualifier words removed (e.g. "$12.99").
    pub price: String,

    /// Shop-specific product identifier, when an id pattern matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

/// Outcome of a completed extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Items in document order.
    pub products: Vec<ExtractedItem>,

    /// Longest uninterrupted work slice.
    pub longest_task_ms: f64,

    /// Sum of all work slices.
    pub total_tasks_ms: f64,

    /// Wall-clock duration of the run, sleeps included.
    pub elapsed_ms: f64,

    /// The work budget ran out; `products` holds what was found before.
    pub timed_out: bool,
}

/// What an extraction invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The scan root has not rendered yet and the page is still loading.
    /// Invoke again later.
    NotReady,

    Ready(ExtractionResult),
}

impl Extraction {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The result, if the page was ready.
    #[must_use]
    pub fn into_result(self) -> Option<ExtractionResult> {
        match self {
            Self::Ready(result) => Some(result),
            Self::NotReady => None,
        }
    }
}
