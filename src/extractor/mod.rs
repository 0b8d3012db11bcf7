//! Cart line item extraction.
//!
//! # Module Structure
//!
//! - `state`: processed-set and accepted items of one run
//! - `candidates`: narrow (host selector) and generic (link clustering) candidate discovery
//! - `filter`: geometry and visibility filter
//! - `classify`: cart item classifier and the saved-for-later section
//! - `image`, `url`, `title`, `price`, `product_id`: field extractors
//! - `pipeline`: the orchestrator
//!
//! # Usage
//!
//! ```rust,ignore
//! use rs_cart_extraction::extractor::pipeline;
//!
//! let snapshot = HtmlSnapshot::parse(html, "https://shop.example/cart")?;
//! let extraction = pipeline::extract(&snapshot, &options).await;
//! ```

pub mod pipeline;
pub mod product_id;
pub mod state;

mod candidates;
mod classify;
mod filter;
mod image;
mod price;
mod title;
mod url;

pub use pipeline::extract;
pub use product_id::{IdPattern, IdRule, ProductIdTable};
pub use state::ExtractionState;
