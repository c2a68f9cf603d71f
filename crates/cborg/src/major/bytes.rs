//! Major type 2: byte strings, and the length-prefixed payload handling
//! shared with text strings.

use core::cmp::Ordering;

use crate::{
    buf::Buffer,
    bytes::compare_bytes,
    common::{assert_enough_data, prefix_bytes},
    decode::DecodeOptions,
    token::{Token, TokenValue, Type},
    Error, ErrorKind, Result,
};

use super::{
    invalid_token,
    uint::{encode_head, head_size, read_argument},
};

/// Locates the payload of the length-prefixed item starting at `pos`.
///
/// Returns the payload and the total encoded length of the item.
pub(crate) fn read_payload<'a>(
    data: &'a [u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<(&'a [u8], usize)> {
    let prefix = prefix_bytes(minor);
    let len = read_argument(data, pos, minor, options)?;
    let total = usize::try_from(len)
        .ok()
        .and_then(|len| len.checked_add(prefix))
        .ok_or_else(|| Error::new(ErrorKind::NotEnoughData, pos))?;
    assert_enough_data(data, pos, total)?;
    Ok((&data[pos + prefix..pos + total], total))
}

/// Decodes a byte string of any definite length.
pub(crate) fn decode_bytes(
    data: &[u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let (payload, total) = read_payload(data, pos, minor, options)?;
    Ok(Token::with_length(
        Type::BYTES,
        TokenValue::Bytes(payload.to_vec()),
        total,
    ))
}

/// Writes the length prefix of a string type followed by the payload.
pub(crate) fn encode_payload<B>(buf: &mut B, major_encoded: u8, payload: &[u8]) -> Result<()>
where
    B: Buffer + ?Sized,
{
    encode_head(buf, major_encoded, payload.len() as u64)?;
    buf.push(payload)
}

pub(crate) fn encode<B>(buf: &mut B, token: &Token) -> Result<()>
where
    B: Buffer + ?Sized,
{
    match token.value() {
        TokenValue::Bytes(b) => encode_payload(buf, Type::BYTES.major_encoded(), b),
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn encoded_size(token: &Token) -> Result<usize> {
    let len = token.as_bytes().ok_or_else(|| invalid_token(token))?.len();
    Ok(head_size(len as u64) + len)
}

pub(crate) fn compare_tokens(t1: &Token, t2: &Token) -> Ordering {
    compare_bytes(
        t1.as_bytes().unwrap_or_default(),
        t2.as_bytes().unwrap_or_default(),
    )
}
