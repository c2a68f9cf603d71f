//! Major type 3: UTF-8 text strings.

use crate::{
    buf::Buffer,
    bytes::to_text,
    decode::DecodeOptions,
    token::{Token, TokenValue, Type},
    Result,
};

use super::{bytes::encode_payload, bytes::read_payload, invalid_token};

/// Decodes a text string of any definite length.
///
/// Invalid UTF-8 is replaced with `U+FFFD`. With `retain_string_bytes` the
/// raw payload is kept on the token.
pub(crate) fn decode_string(
    data: &[u8],
    pos: usize,
    minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    let (payload, total) = read_payload(data, pos, minor, options)?;
    let token = Token::with_length(
        Type::STRING,
        TokenValue::Text(to_text(payload).into_owned()),
        total,
    );
    if options.retain_string_bytes {
        Ok(token.with_byte_value(payload.to_vec()))
    } else {
        Ok(token)
    }
}

pub(crate) fn encode<B>(buf: &mut B, token: &Token) -> Result<()>
where
    B: Buffer + ?Sized,
{
    match token.value() {
        TokenValue::Text(s) => encode_payload(buf, Type::STRING.major_encoded(), s.as_bytes()),
        _ => Err(invalid_token(token)),
    }
}
