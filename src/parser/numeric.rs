//! Locale-independent number scanning for element text and attributes
//!
//! Lists are whitespace-separated. Scanning stops silently at the first token
//! that does not parse; everything after it is ignored.

use std::str::FromStr;

/// Append every leading parsable token of `text` to `out`
fn scan_into<T: FromStr>(text: &str, out: &mut Vec<T>) {
    out.extend(
        text.split_ascii_whitespace()
            .map_while(|token| token.parse::<T>().ok()),
    );
}

/// Parse a whitespace-separated float list
pub(crate) fn parse_floats(text: &str, out: &mut Vec<f32>) {
    scan_into(text, out);
}

/// Parse a whitespace-separated list of non-negative indices
pub(crate) fn parse_indices(text: &str, out: &mut Vec<u32>) {
    scan_into(text, out);
}

/// True if every parsable face size in a `<vcount>` list is 3
pub(crate) fn all_triangles(vcount: &str) -> bool {
    vcount
        .split_ascii_whitespace()
        .map_while(|token| token.parse::<u32>().ok())
        .all(|n| n == 3)
}

/// Parse the leading decimal digits of an attribute value
///
/// Leading whitespace and a `+` sign are skipped. Values with no leading digit
/// read as 0 and values too large for `usize` saturate. There is no radix
/// prefix: `0x10` reads as 0 and `010` as 10.
pub(crate) fn parse_unsigned_prefix(value: &str) -> usize {
    let trimmed = value.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0usize, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(usize::from(digit - b'0'))
        })
}
