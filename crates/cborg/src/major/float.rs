//! Major type 7: floats, the simple values `false`, `true`, `null` and
//! `undefined`, and the break marker.

use core::cmp::Ordering;

use half::f16;

use crate::{
    buf::Buffer,
    common::assert_enough_data,
    decode::DecodeOptions,
    encode::EncodeOptions,
    token::{Token, TokenValue, Type},
    Error, ErrorKind, Result,
};

use super::invalid_token;

pub(crate) const SIMPLE_FALSE: u8 = 0xf4;
pub(crate) const SIMPLE_TRUE: u8 = 0xf5;
pub(crate) const SIMPLE_NULL: u8 = 0xf6;
pub(crate) const SIMPLE_UNDEFINED: u8 = 0xf7;
pub(crate) const FLOAT_HALF: u8 = 0xf9;
pub(crate) const FLOAT_SINGLE: u8 = 0xfa;
pub(crate) const FLOAT_DOUBLE: u8 = 0xfb;
pub(crate) const BREAK: u8 = 0xff;

/// The half precision quiet NaN written for every NaN.
const HALF_NAN: u16 = 0x7e00;

/// Encodes a float in the narrowest width which represents it exactly.
///
/// Returns the bytes (initial byte included) and how many of them are used.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
pub(crate) fn float_bytes(value: f64, float64: bool) -> ([u8; 9], usize) {
    let mut out = [0u8; 9];
    if !float64 {
        let half = f16::from_f64(value);
        if value.is_nan() || half.to_f64() == value {
            let bits = if value.is_nan() {
                HALF_NAN
            } else {
                half.to_bits()
            };
            out[0] = FLOAT_HALF;
            out[1..3].copy_from_slice(&bits.to_be_bytes());
            return (out, 3);
        }

        let single = value as f32;
        if f64::from(single) == value {
            out[0] = FLOAT_SINGLE;
            out[1..5].copy_from_slice(&single.to_be_bytes());
            return (out, 5);
        }
    }

    out[0] = FLOAT_DOUBLE;
    out[1..9].copy_from_slice(&value.to_be_bytes());
    (out, 9)
}

fn float_token(
    value: f64,
    encoded_length: usize,
    pos: usize,
    options: &DecodeOptions,
) -> Result<Token> {
    if value.is_nan() && !options.allow_nan {
        return Err(Error::new(ErrorKind::NanNotAllowed, pos));
    }
    if value.is_infinite() && !options.allow_infinity {
        return Err(Error::new(ErrorKind::InfinityNotAllowed, pos));
    }
    Ok(Token::with_length(
        Type::FLOAT,
        TokenValue::Float(value),
        encoded_length,
    ))
}

pub(crate) fn decode_float16(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    assert_enough_data(data, pos, 3)?;
    let bits = u16::from_be_bytes([data[pos + 1], data[pos + 2]]);
    float_token(f16::from_bits(bits).to_f64(), 3, pos, options)
}

pub(crate) fn decode_float32(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    assert_enough_data(data, pos, 5)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[pos + 1..pos + 5]);
    float_token(f64::from(f32::from_be_bytes(bytes)), 5, pos, options)
}

pub(crate) fn decode_float64(
    data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    assert_enough_data(data, pos, 9)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[pos + 1..pos + 9]);
    float_token(f64::from_be_bytes(bytes), 9, pos, options)
}

pub(crate) fn decode_false(
    _data: &[u8],
    _pos: usize,
    _minor: u8,
    _options: &DecodeOptions,
) -> Result<Token> {
    Ok(Token::with_length(Type::FALSE, TokenValue::Bool(false), 1))
}

pub(crate) fn decode_true(
    _data: &[u8],
    _pos: usize,
    _minor: u8,
    _options: &DecodeOptions,
) -> Result<Token> {
    Ok(Token::with_length(Type::TRUE, TokenValue::Bool(true), 1))
}

pub(crate) fn decode_null(
    _data: &[u8],
    _pos: usize,
    _minor: u8,
    _options: &DecodeOptions,
) -> Result<Token> {
    Ok(Token::with_length(Type::NULL, TokenValue::None, 1))
}

pub(crate) fn decode_undefined(
    _data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    if !options.allow_undefined {
        return Err(Error::new(ErrorKind::UndefinedNotAllowed, pos));
    }
    if options.coerce_undefined_to_null {
        return Ok(Token::with_length(Type::NULL, TokenValue::None, 1));
    }
    Ok(Token::with_length(Type::UNDEFINED, TokenValue::None, 1))
}

pub(crate) fn decode_break(
    _data: &[u8],
    pos: usize,
    _minor: u8,
    options: &DecodeOptions,
) -> Result<Token> {
    if !options.allow_indefinite {
        return Err(Error::new(ErrorKind::IndefiniteNotAllowed, pos));
    }
    Ok(Token::with_length(Type::BREAK, TokenValue::None, 1))
}

/// The single byte encoding of a simple value or break token.
pub(crate) fn simple_byte(typ: Type) -> Option<u8> {
    if typ == Type::FALSE {
        Some(SIMPLE_FALSE)
    } else if typ == Type::TRUE {
        Some(SIMPLE_TRUE)
    } else if typ == Type::NULL {
        Some(SIMPLE_NULL)
    } else if typ == Type::UNDEFINED {
        Some(SIMPLE_UNDEFINED)
    } else if typ == Type::BREAK {
        Some(BREAK)
    } else {
        None
    }
}

pub(crate) fn encode<B>(buf: &mut B, token: &Token, options: &EncodeOptions) -> Result<()>
where
    B: Buffer + ?Sized,
{
    if let Some(byte) = simple_byte(token.typ()) {
        return buf.push(&[byte]);
    }
    match token.value() {
        TokenValue::Float(value) => {
            let (bytes, len) = float_bytes(*value, options.float64);
            buf.push(&bytes[..len])
        }
        _ => Err(invalid_token(token)),
    }
}

pub(crate) fn encoded_size(token: &Token, options: &EncodeOptions) -> Result<usize> {
    if simple_byte(token.typ()).is_some() {
        return Ok(1);
    }
    match token.value() {
        TokenValue::Float(value) => Ok(float_bytes(*value, options.float64).1),
        _ => Err(invalid_token(token)),
    }
}

/// Simple values order by their single byte encoding and sort before
/// floats, whose encoding is longer. Floats compare numerically.
pub(crate) fn compare_tokens(t1: &Token, t2: &Token) -> Ordering {
    match (t1.value(), t2.value()) {
        (TokenValue::Float(f1), TokenValue::Float(f2)) => f1.total_cmp(f2),
        _ => head_rank(t1.typ()).cmp(&head_rank(t2.typ())),
    }
}

fn head_rank(typ: Type) -> u16 {
    let byte = if typ == Type::FALSE {
        SIMPLE_FALSE
    } else if typ == Type::TRUE {
        SIMPLE_TRUE
    } else if typ == Type::NULL {
        SIMPLE_NULL
    } else if typ == Type::UNDEFINED {
        SIMPLE_UNDEFINED
    } else if typ == Type::BREAK {
        BREAK
    } else {
        return 0x100;
    };
    u16::from(byte)
}
