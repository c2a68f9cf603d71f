//! Major type 1: negative integers, encoded as the magnitude `-1 - value`.

use core::cmp::Ordering;

use crate::{
    buf::Buffer,
    decode::DecodeOptions,
    token::{Token, TokenValue, Type},
    Error, ErrorKind, Result,
};

use super::{
    invalid_token,
    uint::{encode_head, head_size, read_u16, read_u32, read_u64, read_u8},
};

#[inline]
fn token(arg: u64, encoded_length: usize) -> Token {
    Token::with_length(
        Type::NEGINT,
        TokenValue::Negint(-1 - i128::from(arg)),
        encoded_length,
    )
}

/// The argument encoding `value`, or an error if `value` is not in
/// `-2^64..=-1`.
pub(crate) fn to_argument(value: i128) -> Result<u64> {
    if value >= 0 {
        return Err(Error::with_kind(ErrorKind::IntegerOutOfRange(value)));
    }
    u64::try_from(-1 - value).map_err(|_| Error::with_kind(ErrorKind::IntegerOutOfRange(value)))
}

pub(crate) fn decode_negint_compact(
    _data: &[u8],
    _pos: usize,
    minor: u8,
    _options: &DecodeOptions,
) -> Result<Token> {
    Ok(token(u64::from(minor), 1))
}

pub(crate) fn decode_negint8(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    Ok(token(read_u8(data, pos, options)?, 2))
}

pub(crate) fn decode_negint16(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    Ok(token(read_u16(data, pos, options)?, 3))
}

pub(crate) fn decode_negint32(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    Ok(token(read_u32(data, pos, options)?, 5))
}

pub(crate) fn decode_negint64(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let arg = read_u64(data, pos, options)?;
    // -1 - arg must stay at or above i64::MIN
    if arg > i64::MAX.unsigned_abs() && !options.allow_big_int {
        return Err(Error::new(ErrorKind::BigIntNotAllowed, pos));
    }
    Ok(token(arg, 9))
}

pub(crate) fn encode<B>(buf: &mut B, token: &Token) -> Result<()>
where
    B: Buffer + ?Sized,
{
    match token.value() {
        TokenValue::Negint(value) => {
            encode_head(buf, Type::NEGINT.major_encoded(), to_argument(*value)?)
        }
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn encoded_size(token: &Token) -> Result<usize> {
    match token.value() {
        TokenValue::Negint(value) => Ok(head_size(to_argument(*value)?)),
        _ => Err(invalid_token(token)),
    }
}

/// Orders by encoded magnitude, so `-1` sorts before `-2`.
pub(crate) fn compare_tokens(t1: &Token, t2: &Token) -> Ordering {
    match (t1.value(), t2.value()) {
        (TokenValue::Negint(v1), TokenValue::Negint(v2)) => v2.cmp(v1),
        _ => Ordering::Equal,
    }
}
