//! Codecs for the eight CBOR major types.
//!
//! Each module reads items of its type from a byte slice at a given position
//! and writes tokens of its type into a [`Buffer`].

use core::cmp::Ordering;

use crate::{buf::Buffer, encode::EncodeOptions, token::Token, Error, Result};

pub(crate) mod array;
pub(crate) mod bytes;
pub(crate) mod float;
pub(crate) mod map;
pub(crate) mod negint;
pub(crate) mod string;
pub(crate) mod tag;
pub(crate) mod uint;

/// Error for a token whose value does not fit its type.
pub(crate) fn invalid_token(token: &Token) -> Error {
    Error::custom(format_args!(
        "cannot encode {} with value {:?}",
        token.typ(),
        token.value()
    ))
}

/// Writes the encoded form of a token.
pub(crate) fn encode_token<B>(buf: &mut B, token: &Token, options: &EncodeOptions) -> Result<()>
where
    B: Buffer + ?Sized,
{
    match token.typ().major() {
        0 => uint::encode(buf, token),
        1 => negint::encode(buf, token),
        2 => bytes::encode(buf, token),
        3 => string::encode(buf, token),
        4 | 5 => array::encode_header(buf, token),
        6 => tag::encode(buf, token),
        _ => float::encode(buf, token, options),
    }
}

/// Number of bytes [`encode_token`] writes for a token.
pub(crate) fn encoded_size(token: &Token, options: &EncodeOptions) -> Result<usize> {
    match token.typ().major() {
        0 => uint::encoded_size(token),
        1 => negint::encoded_size(token),
        2 | 3 => bytes::encoded_size(token),
        4 | 5 => array::header_size(token),
        6 => tag::encoded_size(token),
        _ => float::encoded_size(token, options),
    }
}

/// Orders two tokens of the same major type.
pub(crate) fn compare_tokens(t1: &Token, t2: &Token) -> Ordering {
    match t1.typ().major() {
        0 => uint::compare_tokens(t1, t2),
        1 => negint::compare_tokens(t1, t2),
        2 | 3 => bytes::compare_tokens(t1, t2),
        4 | 5 => array::compare_headers(t1, t2),
        6 => tag::compare_tokens(t1, t2),
        _ => float::compare_tokens(t1, t2),
    }
}
