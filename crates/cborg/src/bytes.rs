//! Byte slice helpers: ordering, UTF-8 conversion and hex.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{borrow::Cow, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{borrow::Cow, string::String, vec::Vec};

use core::cmp::Ordering;

use crate::Result;

/// Lexicographic comparison of two byte slices.
#[inline]
#[must_use]
pub fn compare(b1: &[u8], b2: &[u8]) -> Ordering {
    b1.cmp(b2)
}

/// Compares byte slices by length first, then lexicographically.
///
/// This is the length-first ordering used for canonical map keys.
#[must_use]
pub fn compare_bytes(b1: &[u8], b2: &[u8]) -> Ordering {
    b1.len().cmp(&b2.len()).then_with(|| compare(b1, b2))
}

/// Decodes UTF-8 text.
///
/// Valid input is borrowed. Invalid sequences are replaced with `U+FFFD`.
#[inline]
#[must_use]
pub fn to_text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Lower-case hex representation of the bytes.
#[inline]
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parses a hex string (either case) into bytes.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidDiagnostic`][crate::ErrorKind::InvalidDiagnostic]
/// if the input has an odd length or contains a character which is not a hex
/// digit.
pub fn from_hex(input: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(input)?)
}
