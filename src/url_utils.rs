//! URL Utility Functions
//!
//! Pure URL helpers for the field extractors: resolving relative references
//! against the page URL, normalizing lazy-load attribute values, reading
//! `srcset` candidates and matching hostnames against override tables.

use url::Url;

/// Resolve a reference against the page URL the way a browser fills in
/// `a.href` / `img.src`.
///
/// # Returns
/// * The absolute URL string, or `None` for an empty or unparsable reference
#[must_use]
pub fn create_absolute_url(reference: &str, base: &Url) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    base.join(reference).ok().map(String::from)
}

/// Normalize a lazy-load attribute value.
///
/// Protocol-relative values get `https:`; anything else that is not an
/// absolute `http(s)` URL is rejected.
#[must_use]
pub fn normalize_lazy_url(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    None
}

/// First image candidate URL of a `srcset` value.
#[must_use]
pub fn first_srcset_url(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .find(|url| !url.is_empty())
}

#[inline]
#[must_use]
pub fn is_javascript_url(href: &str) -> bool {
    href.trim_start()
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

#[inline]
#[must_use]
pub fn is_data_url(src: &str) -> bool {
    src.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// A link whose target is a bare in-page fragment (`#`, `/#`).
#[must_use]
pub fn is_bare_fragment(raw_href: &str, resolved: &str) -> bool {
    let raw = raw_href.trim();
    raw == "#" || raw == "/#" || resolved.ends_with("/#")
}

/// Whether `host` is `key` or a subdomain of it.
#[must_use]
pub fn host_matches(host: &str, key: &str) -> bool {
    let host = host.trim_start_matches("www.");
    let key = key.trim_start_matches("www.");
    host.eq_ignore_ascii_case(key)
        || host
            .len()
            .checked_sub(key.len() + 1)
            .and_then(|split| host.get(split..))
            .is_some_and(|tail| tail.starts_with('.') && tail[1..].eq_ignore_ascii_case(key))
}
