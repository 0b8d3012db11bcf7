//! Product id extraction.
//!
//! Hosts supply per-site patterns (`idExtractionMap`); the id is pulled from
//! the item URL, the image URL or, failing both, the row's markup.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::options::Options;
use crate::tree::VisualTree;
use crate::url_utils::host_matches;

/// One host entry as the host page spells it: either a bare pattern or a
/// pattern with a fixed capture group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdRule {
    Pattern(String),
    Indexed {
        regex: String,
        #[serde(default)]
        index: Option<usize>,
    },
}

impl IdRule {
    fn parts(&self) -> (&str, Option<usize>) {
        match self {
            Self::Pattern(regex) => (regex.as_str(), None),
            Self::Indexed { regex, index } => (regex.as_str(), *index),
        }
    }
}

/// Compiled id pattern.
#[derive(Debug, Clone)]
pub struct IdPattern {
    regex: Regex,
    index: Option<usize>,
}

impl IdPattern {
    /// The configured capture group, or else the last group that
    /// participated in the match.
    #[must_use]
    pub fn capture(&self, haystack: &str) -> Option<String> {
        let caps = self.regex.captures(haystack)?;
        let group = match self.index {
            Some(index) => caps.get(index),
            None => (0..caps.len()).rev().find_map(|i| caps.get(i)),
        };
        group.map(|m| m.as_str().to_string())
    }
}

/// Hostname → id pattern lookup table.
#[derive(Debug, Clone, Default)]
pub struct ProductIdTable {
    entries: Vec<(String, IdPattern)>,
}

impl ProductIdTable {
    /// Compile a host rule map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] naming the first host whose pattern
    /// does not compile.
    pub fn from_rules(rules: BTreeMap<String, IdRule>) -> Result<Self> {
        let mut table = Self::default();
        for (host, rule) in &rules {
            let (regex, index) = rule.parts();
            table.insert(host, regex, index)?;
        }
        Ok(table)
    }

    /// Parse a JSON object of host rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed JSON and
    /// [`Error::InvalidPattern`] for a pattern that does not compile.
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: BTreeMap<String, IdRule> = serde_json::from_str(json)?;
        Self::from_rules(rules)
    }

    /// Add or replace the pattern for `host`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `regex` does not compile.
    pub fn insert(&mut self, host: &str, regex: &str, index: Option<usize>) -> Result<()> {
        let regex = Regex::new(regex).map_err(|source| Error::InvalidPattern {
            host: host.to_string(),
            source,
        })?;
        let pattern = IdPattern { regex, index };
        match self.entries.iter_mut().find(|(key, _)| key == host) {
            Some((_, existing)) => *existing = pattern,
            None => self.entries.push((host.to_string(), pattern)),
        }
        Ok(())
    }

    /// Pattern for the page host, exact or by parent domain.
    #[must_use]
    pub fn lookup(&self, host: &str) -> Option<&IdPattern> {
        self.entries
            .iter()
            .find(|(key, _)| host_matches(host, key))
            .map(|(_, pattern)| pattern)
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

/// Product id for an accepted row, tried against the URL, the image URL
/// and the row markup in that order.
pub(crate) fn extract_product_id<T: VisualTree>(
    tree: &T,
    node: T::Node,
    url: &str,
    image_url: &str,
    options: &Options,
) -> Option<String> {
    let host = tree.page_url().host_str()?;
    let pattern = options
        .product_ids
        .as_ref()
        .and_then(|table| table.lookup(host))
        .or_else(|| options.coupon_ids.as_ref().and_then(|table| table.lookup(host)))?;

    let id = pattern
        .capture(url)
        .or_else(|| pattern.capture(image_url))
        .or_else(|| pattern.capture(&tree.outer_html(node)));
    trace!(?node, ?id, "product id");
    id
}
