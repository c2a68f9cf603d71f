//! Major type 4: arrays. The token carries the element count only.

use core::cmp::Ordering;

use crate::{
    buf::Buffer,
    common::{prefix_bytes, MINOR_INDEFINITE},
    decode::DecodeOptions,
    token::{Token, TokenValue, Type},
    Error, ErrorKind, Result,
};

use super::{
    invalid_token,
    uint::{encode_head, head_size, read_argument},
};

/// Decodes the header of a container with a definite count.
pub(crate) fn decode_header(
    typ: Type,
    data: &[u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let len = read_argument(data, pos, minor, options)?;
    Ok(Token::with_length(
        typ,
        TokenValue::Uint(len),
        prefix_bytes(minor),
    ))
}

/// Decodes the header of an indefinite length container.
pub(crate) fn decode_indefinite_header(
    typ: Type,
    pos: usize,
    options: &DecodeOptions,
) -> Result<Token> {
    if !options.allow_indefinite {
        return Err(Error::new(ErrorKind::IndefiniteNotAllowed, pos));
    }
    Ok(Token::with_length(typ, TokenValue::Indefinite, 1))
}

/// Writes a container header.
pub(crate) fn encode_header<B>(buf: &mut B, token: &Token) -> Result<()>
where
    B: Buffer + ?Sized,
{
    match token.value() {
        TokenValue::Uint(len) => encode_head(buf, token.typ().major_encoded(), *len),
        TokenValue::Indefinite => buf.push(&[token.typ().major_encoded() | MINOR_INDEFINITE]),
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn header_size(token: &Token) -> Result<usize> {
    match token.value() {
        TokenValue::Uint(len) => Ok(head_size(*len)),
        TokenValue::Indefinite => Ok(1),
        _ => Err(invalid_token(token)),
    }
}

/// Orders container headers by count. Indefinite length sorts last.
pub(crate) fn compare_headers(t1: &Token, t2: &Token) -> Ordering {
    let count = |t: &Token| t.as_u64().map_or(u128::MAX, u128::from);
    count(t1).cmp(&count(t2))
}

pub(crate) fn decode_array(
    data: &[u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    decode_header(Type::ARRAY, data, pos, minor, options)
}

pub(crate) fn decode_array_indefinite(
    _data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    decode_indefinite_header(Type::ARRAY, pos, options)
}
