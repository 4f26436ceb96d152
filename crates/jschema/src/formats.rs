//! Format checkers for the fixed assertion list: `date-time`, `date`, `time`,
//! `email`, `hostname`, `ipv4`, `ipv6` and `regex`. Anything else is ignored
//! by the builder.
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::ecma;

pub(crate) fn lookup(format: &str) -> Option<fn(&str) -> bool> {
    match format {
        "date-time" => Some(is_date_time),
        "date" => Some(is_date),
        "time" => Some(is_time),
        "email" => Some(is_email),
        "hostname" => Some(is_hostname),
        "ipv4" => Some(is_ipv4),
        "ipv6" => Some(is_ipv6),
        "regex" => Some(is_regex),
        _ => None,
    }
}

fn two_digits(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_digit) {
        text.parse().ok()
    } else {
        None
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// RFC 3339 `full-date`.
pub(crate) fn is_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let year = &text[..4];
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (Some(month), Some(day)) = (two_digits(&text[5..7]), two_digits(&text[8..10])) else {
        return false;
    };
    let year: u32 = match year.parse() {
        Ok(value) => value,
        Err(_) => return false,
    };
    (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month)
}

/// RFC 3339 `full-time`, leap second permitted.
pub(crate) fn is_time(text: &str) -> bool {
    let (clock, offset) = match text.find(['Z', 'z', '+']) {
        Some(index) => text.split_at(index),
        // A '-' past the clock part is an offset separator.
        None => match text.char_indices().find(|&(i, c)| c == '-' && i >= 8) {
            Some((index, _)) => text.split_at(index),
            None => return false,
        },
    };
    let (hms, fraction) = match clock.split_once('.') {
        Some((hms, fraction)) => (hms, Some(fraction)),
        None => (clock, None),
    };
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    let bytes = hms.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return false;
    }
    let (Some(hour), Some(minute), Some(second)) = (
        two_digits(&hms[..2]),
        two_digits(&hms[3..5]),
        two_digits(&hms[6..8]),
    ) else {
        return false;
    };
    if hour > 23 || minute > 59 || second > 60 {
        return false;
    }
    match offset {
        "Z" | "z" => true,
        _ => {
            let rest = &offset[1..];
            if !(offset.starts_with('+') || offset.starts_with('-')) || rest.len() != 5 {
                return false;
            }
            let bytes = rest.as_bytes();
            if bytes[2] != b':' {
                return false;
            }
            matches!(
                (two_digits(&rest[..2]), two_digits(&rest[3..5])),
                (Some(oh), Some(om)) if oh <= 23 && om <= 59
            )
        }
    }
}

/// RFC 3339 `date-time`.
pub(crate) fn is_date_time(text: &str) -> bool {
    match text.find(['T', 't']) {
        Some(index) => is_date(&text[..index]) && is_time(&text[index + 1..]),
        None => false,
    }
}

/// A pragmatic `addr-spec` check: one `@`, non-empty dot-sane local part,
/// hostname or bracketed IP literal on the right.
pub(crate) fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.rsplit_once('@') else {
        return false;
    };
    if local.is_empty()
        || local.len() > 64
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
    {
        return false;
    }
    if local
        .bytes()
        .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
    {
        return false;
    }
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        return is_ipv4(literal) || literal.strip_prefix("IPv6:").is_some_and(is_ipv6);
    }
    is_hostname(domain)
}

/// RFC 1123 hostname.
pub(crate) fn is_hostname(text: &str) -> bool {
    if text.is_empty() || text.len() > 253 {
        return false;
    }
    text.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// Dotted-quad IPv4, leading zeros rejected.
pub(crate) fn is_ipv4(text: &str) -> bool {
    if text
        .split('.')
        .any(|octet| octet.len() > 1 && octet.starts_with('0'))
    {
        return false;
    }
    text.parse::<Ipv4Addr>().is_ok()
}

pub(crate) fn is_ipv6(text: &str) -> bool {
    text.parse::<Ipv6Addr>().is_ok()
}

/// A string that compiles as an ECMA-262 regular expression.
pub(crate) fn is_regex(text: &str) -> bool {
    ecma::compile_regex(text).is_ok()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    #[test_case("2024-02-29", true; "leap day")]
    #[test_case("2023-02-29", false; "non leap day")]
    #[test_case("2024-13-01", false; "bad month")]
    #[test_case("2024-00-10", false; "zero month")]
    #[test_case("24-01-01", false; "short year")]
    fn date(text: &str, expected: bool) {
        assert_eq!(super::is_date(text), expected);
    }

    #[test_case("23:59:59Z", true)]
    #[test_case("23:59:60Z", true; "leap second")]
    #[test_case("12:00:00.123+05:30", true)]
    #[test_case("12:00:00-08:00", true)]
    #[test_case("24:00:00Z", false; "bad hour")]
    #[test_case("12:00:00", false; "missing offset")]
    #[test_case("12:00:00.Z", false; "empty fraction")]
    fn time(text: &str, expected: bool) {
        assert_eq!(super::is_time(text), expected);
    }

    #[test_case("2018-11-13T20:20:39+00:00", true)]
    #[test_case("2018-11-13t20:20:39z", true; "lowercase separators")]
    #[test_case("2018-11-13 20:20:39Z", false; "space separator")]
    fn date_time(text: &str, expected: bool) {
        assert_eq!(super::is_date_time(text), expected);
    }

    #[test_case("joe.bloggs@example.com", true)]
    #[test_case("joe@[127.0.0.1]", true)]
    #[test_case("@example.com", false)]
    #[test_case("joe..bloggs@example.com", false)]
    #[test_case("plain-address", false)]
    fn email(text: &str, expected: bool) {
        assert_eq!(super::is_email(text), expected);
    }

    #[test_case("www.example.com", true)]
    #[test_case("xn--4gbwdl.xn--wgbh1c", true)]
    #[test_case("-startshyphen.com", false)]
    #[test_case("a".repeat(64).as_str(), false; "label too long")]
    fn hostname(text: &str, expected: bool) {
        assert_eq!(super::is_hostname(text), expected);
    }

    #[test_case("192.168.0.1", true)]
    #[test_case("192.168.0.01", false; "leading zero")]
    #[test_case("256.0.0.1", false)]
    #[test_case("::1", false; "ipv6 is not ipv4")]
    fn ipv4(text: &str, expected: bool) {
        assert_eq!(super::is_ipv4(text), expected);
    }

    #[test_case("::1", true)]
    #[test_case("2001:db8::8a2e:370:7334", true)]
    #[test_case("12345::", false)]
    fn ipv6(text: &str, expected: bool) {
        assert_eq!(super::is_ipv6(text), expected);
    }
}
