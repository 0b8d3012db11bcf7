//! Character encoding detection for snapshot bytes.
//!
//! Archived cart pages arrive as raw bytes in whatever charset the shop
//! served. The declared charset is sniffed from the document head and the
//! bytes are decoded to UTF-8 before parsing.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Only the head of the document is scanned for a declaration.
const SNIFF_LEN: usize = 1024;

/// Matches `<meta charset=...>` as well as the `content="...; charset=..."`
/// form of `http-equiv` declarations.
#[allow(clippy::expect_used)]
static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s;>/]+)"#).expect("CHARSET_RE regex")
});

/// Detect the declared encoding, defaulting to UTF-8.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    // A byte order mark wins over any declaration.
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode snapshot bytes to a UTF-8 string.
///
/// Malformed sequences become U+FFFD rather than failing the page.
#[must_use]
pub fn transcode_to_utf8(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_utf8() {
        assert_eq!(detect_encoding(b"<html><body>Cart</body></html>"), UTF_8);
    }

    #[test]
    fn reads_meta_charset() {
        let html = br#"<html><head><meta charset="ISO-8859-1"></head></html>"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn reads_http_equiv_charset() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=windows-1251">"#;
        assert_eq!(detect_encoding(html).name(), "windows-1251");
    }

    #[test]
    fn decodes_latin1_text() {
        let html = b"<meta charset=\"iso-8859-1\"><span>Caf\xE9 Mug</span>";
        assert!(transcode_to_utf8(html).contains("Café Mug"));
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        let html = br#"<meta charset="no-such-charset">"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }
}
