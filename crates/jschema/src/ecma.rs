//! ECMA-262 regular expression support.
//!
//! `pattern`, `patternProperties` and `format: "regex"` use ECMA-262 syntax.
//! `fancy-regex` covers the backtracking constructs (lookaround,
//! backreferences); the translation below fixes up the escapes that are legal
//! in ECMA but rejected by the Rust engines.
use std::borrow::Cow;

/// Compile an ECMA-262 pattern. Patterns are unanchored, as `pattern`
/// semantics require a substring match.
pub(crate) fn compile_regex(pattern: &str) -> Result<fancy_regex::Regex, fancy_regex::Error> {
    fancy_regex::Regex::new(&to_rust_pattern(pattern))
}

/// Rewrites ECMA escapes that the Rust engines reject: `\/` (legal anywhere
/// in ECMA) and `\cX` control escapes.
fn to_rust_pattern(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains('\\') {
        return Cow::Borrowed(pattern);
    }
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&'/') => {
                out.push('/');
                chars.next();
            }
            Some(&'c') => {
                chars.next();
                match chars.peek() {
                    Some(&letter) if letter.is_ascii_alphabetic() => {
                        chars.next();
                        let code = (letter.to_ascii_uppercase() as u32 - 'A' as u32 + 1) & 0x7f;
                        out.push_str(&format!("\\x{code:02x}"));
                    }
                    _ => out.push_str("\\\\c"),
                }
            }
            _ => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::compile_regex;
    use test_case::test_case;

    #[test_case(r"^\/api\/", "/api/users", true)]
    #[test_case(r"^\/api\/", "api/users", false)]
    #[test_case(r"\cJ", "a\nb", true; "control escape newline")]
    #[test_case("^(?!forbidden)", "allowed", true; "negative lookahead")]
    #[test_case("^(?!forbidden)", "forbidden", false)]
    fn ecma_patterns(pattern: &str, text: &str, expected: bool) {
        let regex = compile_regex(pattern).expect("pattern compiles");
        assert_eq!(regex.is_match(text).unwrap_or(false), expected);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(compile_regex("(unclosed").is_err());
    }
}
