//! Fixed-capacity text fields.
//!
//! [`FixedStr<N>`] holds at most `N` bytes of text. On the wire every field
//! occupies `N + 1` bytes: the text, NUL padding, and a terminator that is
//! always present, even when the text fills the whole capacity.
//!
//! Three ways in:
//!
//! - [`FixedStr::literal`] is a `const fn`; used in a `const` item an oversized
//!   literal fails the build.
//! - [`FixedStr::checked`] rejects oversized input at runtime.
//! - [`FixedStr::truncating`] cuts the input at the last UTF-8 character
//!   boundary that fits.
//!
//! All three end the text at an embedded NUL, as the wire field would on
//! read-back.

use std::fmt;
use std::str::Utf8Error;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Text of at most `N` bytes, stored without a heap allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize> {
    /// Text bytes followed by zero padding
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> FixedStr<N> {
    /// Maximum text length in bytes (terminator excluded).
    pub const CAPACITY: usize = N;

    /// Width of the field on the wire (text plus terminator).
    pub const FIELD_WIDTH: usize = N + 1;

    /// Empty text.
    pub const fn empty() -> Self {
        FixedStr { bytes: [0u8; N], len: 0 }
    }

    /// Build from a literal, panicking if it does not fit.
    ///
    /// In `const` context the panic becomes a compile error:
    ///
    /// ```compile_fail
    /// use eeprom_version_core::FixedStr;
    /// const VENDOR: FixedStr<1> = FixedStr::literal("MN");
    /// println!("{}", VENDOR);
    /// ```
    pub const fn literal(s: &str) -> Self {
        let src = s.as_bytes();
        let mut end = 0;
        while end < src.len() && src[end] != 0 {
            end += 1;
        }
        assert!(end <= N, "text exceeds field capacity");
        let mut bytes = [0u8; N];
        let mut i = 0;
        while i < end {
            bytes[i] = src[i];
            i += 1;
        }
        FixedStr { bytes, len: end }
    }

    /// Build from `s`, or `None` if it is longer than `N` bytes.
    ///
    /// Only the text before the first NUL counts.
    pub fn checked(s: &str) -> Option<Self> {
        let s = until_nul(s);
        if s.len() > N {
            return None;
        }
        Some(Self::copy_from(s.as_bytes()))
    }

    /// Build from `s`, dropping whatever does not fit.
    ///
    /// The cut lands on a character boundary, so the result is always valid
    /// UTF-8 when the input was.
    pub fn truncating(s: &str) -> Self {
        let s = until_nul(s);
        let mut end = s.len().min(N);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        Self::copy_from(&s.as_bytes()[..end])
    }

    /// Decode a terminated wire field of `W = N + 1` bytes.
    ///
    /// Text ends at the first NUL. A field without one (garbage, or a store
    /// written by something else) yields its first `N` bytes, as if the last
    /// byte were the terminator.
    pub fn from_field<const W: usize>(raw: &[u8; W]) -> Self {
        const { assert!(W == N + 1, "wire field must be capacity + 1 bytes") };
        let end = raw[..N].iter().position(|&b| b == 0).unwrap_or(N);
        Self::copy_from(&raw[..end])
    }

    /// Encode as a terminated wire field of `W = N + 1` bytes.
    pub fn to_field<const W: usize>(&self) -> [u8; W] {
        const { assert!(W == N + 1, "wire field must be capacity + 1 bytes") };
        let mut out = [0u8; W];
        out[..self.len].copy_from_slice(self.as_bytes());
        out
    }

    fn copy_from(src: &[u8]) -> Self {
        debug_assert!(src.len() <= N);
        let mut bytes = [0u8; N];
        bytes[..src.len()].copy_from_slice(src);
        FixedStr { bytes, len: src.len() }
    }

    /// Raw text bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Text as `&str`; fails only for bytes that were read back from a store.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn until_nul(s: &str) -> &str {
    s.find('\0').map_or(s, |end| &s[..end])
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl<const N: usize> PartialEq<str> for FixedStr<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> PartialEq<&str> for FixedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

// Human-readable encodings (JSON, TOML) see plain strings.
impl<const N: usize> Serialize for FixedStr<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedStr<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FixedStr::checked(&s).ok_or_else(|| {
            de::Error::custom(format!(
                "text is {} bytes long, field holds at most {}",
                s.len(),
                N
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: FixedStr<18> = FixedStr::literal("September 23, 2024");

    #[test]
    fn test_literal_at_capacity() {
        assert_eq!(DATE.len(), 18);
        assert_eq!(DATE, "September 23, 2024");
        let field: [u8; 19] = DATE.to_field();
        assert_eq!(field[18], 0);
    }

    #[test]
    #[should_panic(expected = "exceeds field capacity")]
    fn test_literal_over_capacity_panics_at_runtime() {
        let _ = FixedStr::<1>::literal("MN");
    }

    #[test]
    fn test_checked() {
        assert_eq!(FixedStr::<7>::checked("1.0.0.0").unwrap().len(), 7);
        assert!(FixedStr::<7>::checked("1.0.0.00").is_none());
        assert!(FixedStr::<7>::checked("").unwrap().is_empty());
    }

    #[test]
    fn test_embedded_nul_ends_text() {
        let s = FixedStr::<20>::checked("Tank\0Plant").unwrap();
        assert_eq!(s, "Tank");
        assert_eq!(s.len(), 4);
        // Only the part before the NUL has to fit.
        assert_eq!(FixedStr::<2>::checked("ab\0cdef").unwrap(), "ab");
        assert_eq!(FixedStr::<7>::truncating("1.0\0.0-beta"), "1.0");
        const LIT: FixedStr<1> = FixedStr::literal("M\0N");
        assert_eq!(LIT, "M");
        let field: [u8; 21] = s.to_field();
        assert_eq!(FixedStr::<20>::from_field(&field), s);
    }

    #[test]
    fn test_truncating_ascii() {
        let s = FixedStr::<7>::truncating("1.0.0-beta");
        assert_eq!(s, "1.0.0-b");
        let field: [u8; 8] = s.to_field();
        assert_eq!(&field, b"1.0.0-b\0");
    }

    #[test]
    fn test_truncating_on_char_boundary() {
        // "é" is two bytes; a cut after byte 2 would split it.
        let s = FixedStr::<2>::truncating("aé");
        assert_eq!(s, "a");
        assert_eq!(s.to_str().unwrap(), "a");
    }

    #[test]
    fn test_from_field_stops_at_nul() {
        let raw = *b"Tank\0zzzz";
        let s = FixedStr::<8>::from_field(&raw);
        assert_eq!(s, "Tank");
    }

    #[test]
    fn test_from_field_unterminated() {
        let raw = [0xFFu8; 8];
        let s = FixedStr::<7>::from_field(&raw);
        assert_eq!(s.len(), 7);
        assert!(s.to_str().is_err());
        let back: [u8; 8] = s.to_field();
        assert_eq!(back[7], 0);
    }

    #[test]
    fn test_to_field_zero_pads() {
        let s = FixedStr::<20>::literal("Tank Plant");
        let field: [u8; 21] = s.to_field();
        assert_eq!(&field[..10], b"Tank Plant");
        assert!(field[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_display_and_debug() {
        let s = FixedStr::<1>::literal("N");
        assert_eq!(s.to_string(), "N");
        assert_eq!(format!("{:?}", s), "\"N\"");
    }

    #[test]
    fn test_serde_rejects_oversized() {
        let ok: FixedStr<1> = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(ok, "M");
        assert!(serde_json::from_str::<FixedStr<1>>("\"MN\"").is_err());
    }
}
