//! `contentEncoding` / `contentMediaType` checks.
//!
//! Only decodability is asserted, so the base64 check validates the alphabet
//! and padding without materialising the decoded bytes.
use serde::de::IgnoredAny;

/// RFC 4648 base64, padding required, no line breaks.
pub(crate) fn is_base64(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if text.len() % 4 != 0 {
        return false;
    }
    let bytes = text.as_bytes();
    let padding = bytes.iter().rev().take_while(|&&b| b == b'=').count();
    if padding > 2 {
        return false;
    }
    bytes[..bytes.len() - padding]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Whether `text` parses as a JSON document.
pub(crate) fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

/// The media types this library can actually check.
pub(crate) fn media_type_check(media_type: &str) -> Option<fn(&str) -> bool> {
    match media_type {
        "application/json" => Some(is_json),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_base64, is_json};
    use test_case::test_case;

    #[test_case("", true)]
    #[test_case("Zm9vYmFy", true)]
    #[test_case("Zm9vYg==", true)]
    #[test_case("Zm9vYg=", false; "bad length")]
    #[test_case("Zm9v!mFy", false; "bad alphabet")]
    #[test_case("====", false; "too much padding")]
    fn base64(text: &str, expected: bool) {
        assert_eq!(is_base64(text), expected);
    }

    #[test_case("{\"a\": [1, 2]}", true)]
    #[test_case("not json", false)]
    #[test_case("null", true)]
    fn json(text: &str, expected: bool) {
        assert_eq!(is_json(text), expected);
    }
}
