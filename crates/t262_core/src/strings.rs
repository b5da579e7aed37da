//! Define shared string semantics (pure helpers).
//!
//! Script strings are sequences of UTF-16 code units. The runtime stores them as Rust strings; the helpers here
//! perform the operations whose results depend on code units rather than on Unicode scalars.
//!
//! ## Notes
//! - `escape` / `unescape` are the Annex B global functions. They encode by code unit, so a non-BMP character
//!   becomes two `%uXXXX` escapes.

use std::cmp::Ordering;

/// Characters `escape` leaves untouched.
const ESCAPE_PASSTHROUGH: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789@*_+-./";

/// Longest string the runtime builds, in UTF-16 code units. Longer results throw `RangeError`.
pub const MAX_STRING_LENGTH: usize = (1 << 28) - 16;

/// Length in UTF-16 code units (`"..".length`).
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Compare by UTF-16 code units, which is how the relational operators order strings.
pub fn utf16_cmp(lhs: &str, rhs: &str) -> Ordering {
    lhs.encode_utf16().cmp(rhs.encode_utf16())
}

/// The single code unit at `index`, as a string, or `None` past the end.
pub fn utf16_unit_at(s: &str, index: usize) -> Option<String> {
    s.encode_utf16()
        .nth(index)
        .map(|unit| String::from_utf16_lossy(&[unit]))
}

/// Annex B `escape`.
///
/// ## Examples
/// ```rust
/// use t262_core::strings::escape;
/// assert_eq!(escape("a b"), "a%20b");
/// assert_eq!(escape("ä"), "%E4");
/// assert_eq!(escape("\u{4e2d}"), "%u4E2D");
/// ```
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for unit in s.encode_utf16() {
        match char::from_u32(u32::from(unit)) {
            Some(c) if ESCAPE_PASSTHROUGH.contains(c) => out.push(c),
            _ if unit < 256 => out.push_str(&format!("%{unit:02X}")),
            _ => out.push_str(&format!("%u{unit:04X}")),
        }
    }
    out
}

/// Length in code units of `escape(s)`, without building it.
pub fn escaped_len(s: &str) -> usize {
    s.encode_utf16()
        .map(|unit| match char::from_u32(u32::from(unit)) {
            Some(c) if ESCAPE_PASSTHROUGH.contains(c) => 1,
            _ if unit < 256 => 3,
            _ => 6,
        })
        .sum()
}

/// Annex B `unescape`. Malformed `%` sequences are kept literally.
///
/// ## Examples
/// ```rust
/// use t262_core::strings::unescape;
/// assert_eq!(unescape("a%20b%u4E2D"), "a b\u{4e2d}");
/// assert_eq!(unescape("100%"), "100%");
/// ```
pub fn unescape(s: &str) -> String {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut out: Vec<u16> = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        if units[i] == u16::from(b'%') {
            if let Some(value) = hex_units(&units, i + 2, 4).filter(|_| units.get(i + 1) == Some(&u16::from(b'u'))) {
                out.push(value);
                i += 6;
                continue;
            }
            if let Some(value) = hex_units(&units, i + 1, 2) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(units[i]);
        i += 1;
    }
    String::from_utf16_lossy(&out)
}

fn hex_units(units: &[u16], start: usize, count: usize) -> Option<u16> {
    let slice = units.get(start..start + count)?;
    slice.iter().try_fold(0u16, |acc, unit| {
        let digit = char::from_u32(u32::from(*unit))?.to_digit(16)?;
        Some(acc * 16 + digit as u16)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough_set() {
        assert_eq!(escape(ESCAPE_PASSTHROUGH), ESCAPE_PASSTHROUGH);
        assert_eq!(escape("!"), "%21");
    }

    #[test]
    fn test_escaped_len_matches_escape() {
        for s in ["", "abc", "a b", "ä!", "\u{4e2d}x", "\u{1F600}"] {
            assert_eq!(escaped_len(s), utf16_len(&escape(s)), "{s:?}");
        }
    }

    #[test]
    fn test_escape_non_bmp_uses_surrogates() {
        assert_eq!(escape("\u{1F600}"), "%uD83D%uDE00");
        assert_eq!(unescape("%uD83D%uDE00"), "\u{1F600}");
    }

    #[test]
    fn test_unescape_keeps_malformed_sequences() {
        assert_eq!(unescape("%zz%u12"), "%zz%u12");
    }

    #[test]
    fn test_utf16_ordering_differs_from_scalar_ordering() {
        // U+FF61 sorts before U+1F600 by scalar value but after its leading surrogate by code unit.
        assert_eq!(utf16_cmp("\u{FF61}", "\u{1F600}"), Ordering::Greater);
        assert_eq!(utf16_len("\u{1F600}"), 2);
    }
}
