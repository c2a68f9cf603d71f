//! Dispatch tables keyed by the leading byte of an item.
//!
//! [`QUICK`] holds the single byte items which need no decoding at all.
//! [`JUMP`] maps every byte to the decode function for its major type and
//! argument width.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

use crate::{
    common::{assert_enough_data, MINOR_U8},
    decode::DecodeOptions,
    major::{array, bytes, float, map, negint, string, tag, uint},
    token::{Token, TokenValue, Type},
    Error, ErrorKind, Result,
};

/// Decodes the item starting at a position, given the minor of its leading
/// byte.
pub(crate) type DecodeFn = fn(&[u8], usize, u8, &DecodeOptions) -> Result<Token>;

fn invalid_minor(data: &[u8], pos: usize, minor: u8, _options: &DecodeOptions) -> Result<Token> {
    Err(Error::new(
        ErrorKind::InvalidMinor {
            major: data.get(pos).map_or(0, |b| b >> 5),
            minor,
        },
        pos,
    ))
}

fn indefinite_string(
    _data: &[u8],
    pos: usize,
    _minor: u8,
    _options: &DecodeOptions,
) -> Result<Token> {
    Err(Error::new(ErrorKind::UnsupportedIndefiniteString, pos))
}

fn simple_value(data: &[u8], pos: usize, minor: u8, _options: &DecodeOptions) -> Result<Token> {
    let value = if minor == MINOR_U8 {
        assert_enough_data(data, pos, 2)?;
        data[pos + 1]
    } else {
        minor
    };
    Err(Error::new(ErrorKind::UnsupportedSimpleValue(value), pos))
}

const fn build_jump() -> [DecodeFn; 256] {
    let invalid: DecodeFn = invalid_minor;
    let mut jump = [invalid; 256];

    let mut i = 0;
    while i < 24 {
        jump[i] = uint::decode_uint_compact;
        jump[0x20 + i] = negint::decode_negint_compact;
        jump[0xe0 + i] = simple_value;
        i += 1;
    }
    jump[0x18] = uint::decode_uint8;
    jump[0x19] = uint::decode_uint16;
    jump[0x1a] = uint::decode_uint32;
    jump[0x1b] = uint::decode_uint64;
    jump[0x38] = negint::decode_negint8;
    jump[0x39] = negint::decode_negint16;
    jump[0x3a] = negint::decode_negint32;
    jump[0x3b] = negint::decode_negint64;

    // Minors 0 through 27 read their length or number with the shared
    // argument reader
    let mut i = 0;
    while i < 28 {
        jump[0x40 + i] = bytes::decode_bytes;
        jump[0x60 + i] = string::decode_string;
        jump[0x80 + i] = array::decode_array;
        jump[0xa0 + i] = map::decode_map;
        jump[0xc0 + i] = tag::decode_tag;
        i += 1;
    }
    jump[0x5f] = indefinite_string;
    jump[0x7f] = indefinite_string;
    jump[0x9f] = array::decode_array_indefinite;
    jump[0xbf] = map::decode_map_indefinite;

    jump[0xf4] = float::decode_false;
    jump[0xf5] = float::decode_true;
    jump[0xf6] = float::decode_null;
    jump[0xf7] = float::decode_undefined;
    jump[0xf8] = simple_value;
    jump[0xf9] = float::decode_float16;
    jump[0xfa] = float::decode_float32;
    jump[0xfb] = float::decode_float64;
    jump[0xff] = float::decode_break;

    jump
}

/// Decode function for every leading byte.
pub(crate) static JUMP: [DecodeFn; 256] = build_jump();

/// A prebuilt single byte token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quick {
    Uint(u8),
    Negint(u8),
    EmptyBytes,
    EmptyString,
    EmptyArray,
    EmptyMap,
    False,
    True,
    Null,
}

impl Quick {
    #[inline]
    pub(crate) fn token(self) -> Token {
        let (typ, value) = match self {
            Quick::Uint(n) => (Type::UINT, TokenValue::Uint(u64::from(n))),
            Quick::Negint(n) => (Type::NEGINT, TokenValue::Negint(-1 - i128::from(n))),
            Quick::EmptyBytes => (Type::BYTES, TokenValue::Bytes(Vec::new())),
            Quick::EmptyString => (Type::STRING, TokenValue::Text(String::new())),
            Quick::EmptyArray => (Type::ARRAY, TokenValue::Uint(0)),
            Quick::EmptyMap => (Type::MAP, TokenValue::Uint(0)),
            Quick::False => (Type::FALSE, TokenValue::Bool(false)),
            Quick::True => (Type::TRUE, TokenValue::Bool(true)),
            Quick::Null => (Type::NULL, TokenValue::None),
        };
        Token::with_length(typ, value, 1)
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn build_quick() -> [Option<Quick>; 256] {
    let mut quick = [None; 256];
    let mut i = 0;
    while i < 24 {
        quick[i] = Some(Quick::Uint(i as u8));
        quick[0x20 + i] = Some(Quick::Negint(i as u8));
        i += 1;
    }
    quick[0x40] = Some(Quick::EmptyBytes);
    quick[0x60] = Some(Quick::EmptyString);
    quick[0x80] = Some(Quick::EmptyArray);
    quick[0xa0] = Some(Quick::EmptyMap);
    quick[0xf4] = Some(Quick::False);
    quick[0xf5] = Some(Quick::True);
    quick[0xf6] = Some(Quick::Null);
    // `undefined` and break are policy dependent and always go through JUMP
    quick
}

/// Tokens which decode without looking past their leading byte.
pub(crate) static QUICK: [Option<Quick>; 256] = build_quick();

/// The single byte encoding of a token, if it has one.
pub(crate) fn quick_encode_token(token: &Token) -> Option<u8> {
    match (token.typ().major(), token.value()) {
        (0, TokenValue::Uint(n)) if *n < 24 => u8::try_from(*n).ok(),
        (1, TokenValue::Negint(n)) if (-24..0).contains(n) => u8::try_from(31 - *n).ok(),
        (2, TokenValue::Bytes(b)) if b.is_empty() => Some(0x40),
        (3, TokenValue::Text(s)) if s.is_empty() => Some(0x60),
        (4, TokenValue::Uint(0)) => Some(0x80),
        (5, TokenValue::Uint(0)) => Some(0xa0),
        (7, _) if token.typ() != Type::BREAK => float::simple_byte(token.typ()),
        _ => None,
    }
}
