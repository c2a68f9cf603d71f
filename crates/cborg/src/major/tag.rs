//! Major type 6: tags. The token carries the tag number; the tagged content
//! follows as the next item.

use core::cmp::Ordering;

use crate::{
    buf::Buffer,
    common::prefix_bytes,
    decode::DecodeOptions,
    token::{Token, TokenValue, Type},
    Result,
};

use super::{
    invalid_token,
    uint::{encode_head, head_size, read_argument},
};

pub(crate) fn decode_tag(
    data: &[u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let num = read_argument(data, pos, minor, options)?;
    Ok(Token::with_length(
        Type::TAG,
        TokenValue::Uint(num),
        prefix_bytes(minor),
    ))
}

pub(crate) fn encode<B>(buf: &mut B, token: &Token) -> Result<()>
where
    B: Buffer + ?Sized,
{
    match token.value() {
        TokenValue::Uint(num) => encode_head(buf, Type::TAG.major_encoded(), *num),
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn encoded_size(token: &Token) -> Result<usize> {
    match token.value() {
        TokenValue::Uint(num) => Ok(head_size(*num)),
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn compare_tokens(t1: &Token, t2: &Token) -> Ordering {
    t1.as_u64().cmp(&t2.as_u64())
}
