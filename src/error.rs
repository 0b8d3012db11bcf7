//! Error types for rs-cart-extraction.
//!
//! Extraction itself never fails: rejected candidates are dropped and an
//! exhausted budget is reported through `ExtractionResult::timed_out`. These
//! errors only come from building the inputs (snapshots, options, id tables).

/// Error type for snapshot and configuration construction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page URL could not be parsed as an absolute URL.
    #[error("invalid page URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A host-supplied id extraction regex failed to compile.
    #[error("invalid id extraction pattern for {host}: {source}")]
    InvalidPattern {
        host: String,
        #[source]
        source: regex::Error,
    },

    /// Host-supplied configuration JSON was malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for construction operations.
pub type Result<T> = std::result::Result<T, Error>;
