//! Absolute-URI handling for schema identifiers.
//!
//! Schema nodes are keyed by normalised absolute URIs in which the fragment is
//! significant. Normalisation is RFC 3986 syntax-based: case of scheme and
//! percent-encoded triplets, decoding of unreserved characters, and dot-segment
//! removal. Two identifiers are the same identifier iff their normalised
//! strings are equal.
use fluent_uri::{Uri, UriRef};
use thiserror::Error;

/// Base URI assumed for documents compiled without a retrieval URI.
pub const DEFAULT_BASE_URI: &str = "json-schema:///";

#[derive(Debug, Error)]
pub enum UriError {
    #[error("invalid URI {uri:?}: {reason}")]
    Parse { uri: String, reason: String },
    #[error("cannot resolve {reference:?}: {reason}")]
    Resolve { reference: String, reason: String },
}

/// Parse and normalise an absolute URI.
pub fn parse(input: &str) -> Result<Uri<String>, UriError> {
    match Uri::parse(input.to_owned()) {
        Ok(uri) => Ok(uri.normalize()),
        Err(error) => Err(UriError::Parse {
            uri: input.to_owned(),
            reason: error.to_string(),
        }),
    }
}

/// Resolve a (possibly relative) reference against an absolute base and
/// normalise the result.
pub fn resolve_against(base: &Uri<String>, reference: &str) -> Result<Uri<String>, UriError> {
    let parsed = UriRef::parse(reference).map_err(|error| UriError::Parse {
        uri: reference.to_owned(),
        reason: error.to_string(),
    })?;
    let resolved = parsed
        .resolve_against(base)
        .map_err(|error| UriError::Resolve {
            reference: reference.to_owned(),
            reason: error.to_string(),
        })?;
    Ok(resolved.normalize())
}

/// Classification of a URI fragment.
///
/// Only plain-name fragments can be targets of `$dynamicRef`; JSON Pointer
/// fragments address raw document locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// No fragment, or the empty fragment `#`.
    Empty,
    /// A JSON Pointer fragment (`#/a/b`), percent-decoded.
    Pointer(String),
    /// A plain-name anchor fragment (`#name`), percent-decoded.
    Anchor(String),
}

impl Fragment {
    pub fn of(uri: &str) -> Fragment {
        match uri.split_once('#') {
            None | Some((_, "")) => Fragment::Empty,
            Some((_, fragment)) => {
                let decoded = percent_decode(fragment);
                if decoded.starts_with('/') {
                    Fragment::Pointer(decoded)
                } else {
                    Fragment::Anchor(decoded)
                }
            }
        }
    }

    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Fragment::Pointer(_))
    }
}

/// Strip the fragment, returning the document part of an identifier.
#[must_use]
pub fn without_fragment(uri: &str) -> &str {
    uri.split_once('#').map_or(uri, |(base, _)| base)
}

/// Drop a trailing empty fragment so that `…/schema#` and `…/schema` name the
/// same registry entry.
#[must_use]
pub fn strip_empty_fragment(uri: &str) -> &str {
    uri.strip_suffix('#').unwrap_or(uri)
}

/// Append a JSON Pointer token to the fragment of an identifier string.
///
/// The token is escaped per RFC 6901 (`~` and `/`) and percent-encoded for the
/// fragment production, so the result is a valid normalised URI string.
#[must_use]
pub fn append_pointer_token(uri: &str, token: &str) -> String {
    let mut out = String::with_capacity(uri.len() + token.len() + 2);
    if uri.contains('#') {
        out.push_str(uri);
    } else {
        out.push_str(uri);
        out.push('#');
    }
    out.push('/');
    out.push_str(&encode_fragment(&escape_pointer_token(token)));
    out
}

/// Escape a single JSON Pointer token per RFC 6901.
#[must_use]
pub fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Percent-encode a string for use inside a URI fragment.
///
/// Leaves the fragment production's allowed characters intact so that
/// constructed identifiers compare equal to identifiers obtained through
/// reference resolution.
#[must_use]
pub fn encode_fragment(fragment: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(fragment.len());
    for byte in fragment.bytes() {
        let allowed = byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'-' | b'.'
                    | b'_'
                    | b'~'
                    | b'!'
                    | b'$'
                    | b'&'
                    | b'\''
                    | b'('
                    | b')'
                    | b'*'
                    | b'+'
                    | b','
                    | b';'
                    | b'='
                    | b':'
                    | b'@'
                    | b'/'
                    | b'?'
            );
        if allowed {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

/// Percent-decode a fragment string.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("http://example.com/root.json", "other.json", "http://example.com/other.json")]
    #[test_case("http://example.com/a/b.json", "#/definitions/x", "http://example.com/a/b.json#/definitions/x")]
    #[test_case("http://example.com/a/b.json", "#anchor", "http://example.com/a/b.json#anchor")]
    #[test_case("http://example.com/a/", "../c.json", "http://example.com/c.json")]
    #[test_case("json-schema:///", "nested.json", "json-schema:///nested.json")]
    fn resolution(base: &str, reference: &str, expected: &str) {
        let base = parse(base).expect("valid base");
        let resolved = resolve_against(&base, reference).expect("resolvable");
        assert_eq!(resolved.as_str(), expected);
    }

    #[test_case("http://e.com/s.json", Fragment::Empty; "no_fragment")]
    #[test_case("http://e.com/s.json#", Fragment::Empty; "empty_fragment")]
    #[test_case("http://e.com/s.json#/a/b", Fragment::Pointer("/a/b".into()))]
    #[test_case("http://e.com/s.json#items", Fragment::Anchor("items".into()))]
    #[test_case("http://e.com/s.json#/a%20b", Fragment::Pointer("/a b".into()))]
    fn fragment_classification(uri: &str, expected: Fragment) {
        assert_eq!(Fragment::of(uri), expected);
    }

    #[test]
    fn pointer_token_escaping() {
        assert_eq!(
            append_pointer_token("http://e.com/s.json", "a/b~c"),
            "http://e.com/s.json#/a~1b~0c"
        );
        assert_eq!(
            append_pointer_token("http://e.com/s.json#/x", "y"),
            "http://e.com/s.json#/x/y"
        );
    }

    #[test]
    fn strip_fragment() {
        assert_eq!(without_fragment("http://e.com/s.json#/a"), "http://e.com/s.json");
        assert_eq!(without_fragment("http://e.com/s.json"), "http://e.com/s.json");
    }
}
