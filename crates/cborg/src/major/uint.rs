//! Major type 0: unsigned integers, and the argument encoding shared by every
//! other major type.

use core::cmp::Ordering;

use crate::{
    buf::Buffer,
    common::{
        assert_enough_data, MINOR_U16, MINOR_U32, MINOR_U64, MINOR_U8, UINT_BOUNDARIES,
    },
    decode::DecodeOptions,
    token::{Token, TokenValue, Type},
    Error, ErrorKind, Result,
};

use super::invalid_token;

#[inline]
fn be_bytes<const N: usize>(data: &[u8], start: usize) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(&data[start..start + N]);
    out
}

#[inline]
fn check_strict(value: u64, boundary: usize, pos: usize, options: &DecodeOptions) -> Result<u64> {
    if options.strict && u128::from(value) < UINT_BOUNDARIES[boundary] {
        return Err(Error::new(ErrorKind::OverlongEncoding, pos));
    }
    Ok(value)
}

/// Reads the 1 byte argument of the item starting at `pos`.
pub(crate) fn read_u8(data: &[u8], pos: usize, options: &DecodeOptions) -> Result<u64> {
    assert_enough_data(data, pos, 2)?;
    check_strict(u64::from(data[pos + 1]), 0, pos, options)
}

/// Reads the 2 byte argument of the item starting at `pos`.
pub(crate) fn read_u16(data: &[u8], pos: usize, options: &DecodeOptions) -> Result<u64> {
    assert_enough_data(data, pos, 3)?;
    let value = u16::from_be_bytes(be_bytes(data, pos + 1));
    check_strict(u64::from(value), 1, pos, options)
}

/// Reads the 4 byte argument of the item starting at `pos`.
pub(crate) fn read_u32(data: &[u8], pos: usize, options: &DecodeOptions) -> Result<u64> {
    assert_enough_data(data, pos, 5)?;
    let value = u32::from_be_bytes(be_bytes(data, pos + 1));
    check_strict(u64::from(value), 2, pos, options)
}

/// Reads the 8 byte argument of the item starting at `pos`.
pub(crate) fn read_u64(data: &[u8], pos: usize, options: &DecodeOptions) -> Result<u64> {
    assert_enough_data(data, pos, 9)?;
    let value = u64::from_be_bytes(be_bytes(data, pos + 1));
    check_strict(value, 3, pos, options)
}

/// Reads the argument of the item starting at `pos` for any minor.
///
/// Minors 0-23 are the argument itself.
pub(crate) fn read_argument(
    data: &[u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<u64> {
    match minor {
        0..=23 => Ok(u64::from(minor)),
        MINOR_U8 => read_u8(data, pos, options),
        MINOR_U16 => read_u16(data, pos, options),
        MINOR_U32 => read_u32(data, pos, options),
        MINOR_U64 => read_u64(data, pos, options),
        _ => Err(Error::new(
            ErrorKind::InvalidMinor {
                major: data.get(pos).map_or(0, |b| b >> 5),
                minor,
            },
            pos,
        )),
    }
}

/// Number of bytes used to encode an argument.
#[must_use]
pub(crate) fn head_size(arg: u64) -> usize {
    let arg = u128::from(arg);
    if arg < UINT_BOUNDARIES[0] {
        1
    } else if arg < UINT_BOUNDARIES[1] {
        2
    } else if arg < UINT_BOUNDARIES[2] {
        3
    } else if arg < UINT_BOUNDARIES[3] {
        5
    } else {
        9
    }
}

/// Writes an initial byte and the minimal width argument which follows it.
pub(crate) fn encode_head<B>(buf: &mut B, major_encoded: u8, arg: u64) -> Result<()>
where
    B: Buffer + ?Sized,
{
    let mut head = [0u8; 9];
    let len = match u8::try_from(arg) {
        Ok(small) if small < MINOR_U8 => {
            head[0] = major_encoded | small;
            1
        }
        Ok(value) => {
            head[0] = major_encoded | MINOR_U8;
            head[1] = value;
            2
        }
        Err(_) => {
            if let Ok(value) = u16::try_from(arg) {
                head[0] = major_encoded | MINOR_U16;
                head[1..3].copy_from_slice(&value.to_be_bytes());
                3
            } else if let Ok(value) = u32::try_from(arg) {
                head[0] = major_encoded | MINOR_U32;
                head[1..5].copy_from_slice(&value.to_be_bytes());
                5
            } else {
                head[0] = major_encoded | MINOR_U64;
                head[1..9].copy_from_slice(&arg.to_be_bytes());
                9
            }
        }
    };
    buf.push(&head[..len])
}

fn check_big_int(value: u64, pos: usize, options: &DecodeOptions) -> Result<u64> {
    if value > i64::MAX.unsigned_abs() && !options.allow_big_int {
        return Err(Error::new(ErrorKind::BigIntNotAllowed, pos));
    }
    Ok(value)
}

pub(crate) fn decode_uint_compact(
    _data: &[u8],
    _pos: usize,
    minor: u8,
    _options: &DecodeOptions,
) -> Result<Token> {
    Ok(Token::with_length(
        Type::UINT,
        TokenValue::Uint(u64::from(minor)),
        1,
    ))
}

pub(crate) fn decode_uint8(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let value = read_u8(data, pos, options)?;
    Ok(Token::with_length(Type::UINT, TokenValue::Uint(value), 2))
}

pub(crate) fn decode_uint16(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let value = read_u16(data, pos, options)?;
    Ok(Token::with_length(Type::UINT, TokenValue::Uint(value), 3))
}

pub(crate) fn decode_uint32(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let value = read_u32(data, pos, options)?;
    Ok(Token::with_length(Type::UINT, TokenValue::Uint(value), 5))
}

pub(crate) fn decode_uint64(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let value = check_big_int(read_u64(data, pos, options)?, pos, options)?;
    Ok(Token::with_length(Type::UINT, TokenValue::Uint(value), 9))
}

pub(crate) fn encode<B>(buf: &mut B, token: &Token) -> Result<()>
where
    B: Buffer + ?Sized,
{
    match token.value() {
        TokenValue::Uint(value) => encode_head(buf, Type::UINT.major_encoded(), *value),
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn encoded_size(token: &Token) -> Result<usize> {
    match token.value() {
        TokenValue::Uint(value) => Ok(head_size(*value)),
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn compare_tokens(t1: &Token, t2: &Token) -> Ordering {
    t1.as_u64().cmp(&t2.as_u64())
}
