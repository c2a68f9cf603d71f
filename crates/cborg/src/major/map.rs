//! Major type 5: maps. The token carries the entry count; encoding and
//! ordering are shared with arrays.

use crate::{
    decode::DecodeOptions,
    token::{Token, Type},
    Result,
};

use super::array::{decode_header, decode_indefinite_header};

pub(crate) fn decode_map(
    data: &[u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    decode_header(Type::MAP, data, pos, minor, options)
}

pub(crate) fn decode_map_indefinite(
    _data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    decode_indefinite_header(Type::MAP, pos, options)
}
