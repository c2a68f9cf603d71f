//! Encoder for CBOR data.
//!
//! Encoding runs in two passes. [`object_to_tokens`] turns a [`Value`] into a
//! [`TokenTree`], sorting map entries and rejecting values which contain
//! themselves, and [`tokens_to_encoded`] writes the tree into a [`Buffer`].
//!
//! The output is deterministic with the default options: integers, lengths
//! and floats use their shortest exact form and map entries are ordered by
//! [`map_sorter`].
//!
//! ```
//! use cborg::{EncodeOptions, Value};
//!
//! let value = Value::Map(vec![(Value::from("b"), Value::Int(2)), (Value::Int(10), Value::Null)]);
//! assert_eq!(cborg::encode(&value, &EncodeOptions::default())?, [0xa2, 0x0a, 0xf6, 0x61, 0x62, 0x02]);
//! # Ok::<(), cborg::Error>(())
//! ```

use core::cmp::Ordering;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{rc::Rc, vec, vec::Vec};
#[cfg(feature = "std")]
use std::{rc::Rc, vec, vec::Vec};

use core::cell::RefCell;

use tracing::{debug, trace, warn};

use crate::{
    buf::{Bl, Buffer, SliceBuf},
    error::{Error, ErrorKind, Result},
    jump::quick_encode_token,
    major::{self, negint},
    token::{Token, TokenTree, TokenValue, Type},
    value::Value,
};

mod options;
mod refs;

pub use options::{EncodeOptions, MapSorter, TypeEncoder};
pub use refs::Ref;

/// Orders map entries canonically by their keys.
///
/// Keys of a lower major type sort first. Keys of the same major type
/// compare by value: integers numerically, byte and text strings by length
/// and then bytewise, simple values by their encoding and ahead of floats.
/// Array and map keys only compare by their entry count, so maps with such
/// keys are not guaranteed a canonical order; a warning is logged when two
/// keys cannot be told apart.
#[must_use]
pub fn map_sorter(e1: &(TokenTree, TokenTree), e2: &(TokenTree, TokenTree)) -> Ordering {
    let (Some(k1), Some(k2)) = (e1.0.first(), e2.0.first()) else {
        return Ordering::Equal;
    };
    if k1.typ().major() != k2.typ().major() {
        return k1.typ().compare(&k2.typ());
    }
    let ord = major::compare_tokens(k1, k2);
    if ord == Ordering::Equal {
        warn!("complex key types used, CBOR key sorting guarantees are gone");
    }
    ord
}

fn int_to_token(value: i128) -> Result<Token> {
    if value >= 0 {
        return u64::try_from(value)
            .map(Token::uint)
            .map_err(|_| Error::with_kind(ErrorKind::IntegerOutOfRange(value)));
    }
    negint::to_argument(value)?;
    Ok(Token::negint(value))
}

fn container(header: Token, children: Vec<TokenTree>, options: &EncodeOptions) -> TokenTree {
    let mut seq = Vec::with_capacity(children.len() + 2);
    if options.add_break_tokens {
        seq.push(Token::new(header.typ(), TokenValue::Indefinite).into());
        seq.extend(children);
        seq.push(Token::new(Type::BREAK, TokenValue::None).into());
    } else {
        seq.push(header.into());
        seq.extend(children);
    }
    TokenTree::Seq(seq)
}

fn map_to_tokens<'v, I>(
    entries: I,
    len: usize,
    options: &EncodeOptions,
    refs: Option<&Ref<'_>>,
) -> Result<TokenTree>
where
    I: Iterator<Item = (Value, &'v Value)>,
{
    let mut pairs = Vec::with_capacity(len);
    for (key, value) in entries {
        pairs.push((
            object_to_tokens(&key, options, refs)?,
            object_to_tokens(value, options, refs)?,
        ));
    }
    if let Some(sorter) = &options.map_sorter {
        pairs.sort_by(|e1, e2| sorter(e1, e2));
    }
    let children = pairs
        .into_iter()
        .flat_map(|(key, value)| [key, value])
        .collect();
    Ok(container(Token::map(len as u64), children, options))
}

fn shared_to_tokens(
    shared: &Rc<RefCell<Value>>,
    options: &EncodeOptions,
    refs: Option<&Ref<'_>>,
) -> Result<TokenTree> {
    let node = Ref::create(Rc::as_ptr(shared).cast(), refs)?;
    let value = shared
        .try_borrow()
        .map_err(|_| Error::custom("shared value is mutably borrowed"))?;
    object_to_tokens(&value, options, Some(&node))
}

/// Converts a value into the tree of tokens which encodes it.
///
/// `refs` is the chain of shared nodes enclosing `value`, `None` at the top
/// level.
///
/// # Errors
///
/// Returns an error if the value contains itself, holds an integer outside
/// `-2^64..2^64`, or a type encoder fails.
pub fn object_to_tokens(
    value: &Value,
    options: &EncodeOptions,
    refs: Option<&Ref<'_>>,
) -> Result<TokenTree> {
    if !matches!(value, Value::Shared(_)) {
        let kind = value.kind();
        if let Some(encoder) = options.type_encoders.get(&kind) {
            if let Some(tokens) = encoder(value, kind, options, refs)? {
                return Ok(tokens);
            }
        }
    }

    let tokens = match value {
        Value::Undefined => Token::undefined().into(),
        Value::Null => Token::null().into(),
        Value::Bool(b) => Token::bool(*b).into(),
        Value::Int(n) => int_to_token(i128::from(*n))?.into(),
        Value::BigInt(n) => int_to_token(*n)?.into(),
        Value::Float(f) => Token::float(f.get()).into(),
        Value::ByteStr(b) => Token::bytes(b.to_vec()).into(),
        Value::TextStr(s) => Token::text(s.clone()).into(),
        Value::Array(arr) => {
            let children = arr
                .iter()
                .map(|v| object_to_tokens(v, options, refs))
                .collect::<Result<Vec<_>>>()?;
            container(Token::array(arr.len() as u64), children, options)
        }
        Value::Object(object) => map_to_tokens(
            object
                .iter()
                .map(|(k, v)| (Value::TextStr(k.clone()), v)),
            object.len(),
            options,
            refs,
        )?,
        Value::Map(entries) => map_to_tokens(
            entries.iter().map(|(k, v)| (k.clone(), v)),
            entries.len(),
            options,
            refs,
        )?,
        Value::Tag(tag) => TokenTree::Seq(vec![
            Token::tag(tag.num()).into(),
            object_to_tokens(tag.content(), options, refs)?,
        ]),
        Value::Shared(shared) => shared_to_tokens(shared, options, refs)?,
    };
    Ok(tokens)
}

/// Writes every token of a tree into a buffer.
///
/// # Errors
///
/// Returns an error if a token does not hold a value of its type or the
/// buffer cannot take the bytes.
pub fn tokens_to_encoded<B>(buf: &mut B, tokens: &TokenTree, options: &EncodeOptions) -> Result<()>
where
    B: Buffer + ?Sized,
{
    tokens.try_for_each(&mut |token: &Token| major::encode_token(&mut *buf, token, options))
}

fn fail(error: Error, options: &EncodeOptions) -> Error {
    let error = error.or_prefix(&options.encode_err_prefix);
    debug!(%error, "encode failed");
    error
}

fn encode_inner(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    let tokens = object_to_tokens(value, options, None)?;
    if options.quick_encode {
        if let Some(byte) = tokens.as_single().and_then(quick_encode_token) {
            return Ok(vec![byte]);
        }
    }
    let mut buf = Bl::new();
    tokens_to_encoded(&mut buf, &tokens, options)?;
    Ok(buf.to_bytes(true))
}

/// Encodes a value into a new byte vector.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded, see
/// [`object_to_tokens`].
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    let bytes = encode_inner(value, options).map_err(|e| fail(e, options))?;
    trace!(len = bytes.len(), "encode");
    Ok(bytes)
}

/// Encodes a value and appends it to a buffer.
///
/// A [`Bl`] reused across calls keeps its first chunk allocated.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded or the buffer cannot
/// take the bytes.
pub fn encode_to<B>(value: &Value, buf: &mut B, options: &EncodeOptions) -> Result<()>
where
    B: Buffer + ?Sized,
{
    let start = buf.len();
    object_to_tokens(value, options, None)
        .and_then(|tokens| tokens_to_encoded(buf, &tokens, options))
        .map_err(|e| fail(e, options))?;
    trace!(len = buf.len() - start, "encode_to");
    Ok(())
}

/// Encodes a value into the start of `dest`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`ErrorKind::BufferTooSmall`] if `dest` cannot hold the encoded
/// value, or any error of [`encode`].
pub fn encode_into(value: &Value, dest: &mut [u8], options: &EncodeOptions) -> Result<usize> {
    let mut buf = SliceBuf::new(dest);
    encode_to(value, &mut buf, options)?;
    Ok(buf.len())
}

/// Returns the number of bytes [`encode`] produces for a value.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
pub fn encoded_length(value: &Value, options: &EncodeOptions) -> Result<usize> {
    let tokens = object_to_tokens(value, options, None).map_err(|e| fail(e, options))?;
    let mut len = 0;
    tokens
        .try_for_each(&mut |token: &Token| {
            len += major::encoded_size(token, options)?;
            Ok::<(), Error>(())
        })
        .map_err(|e| fail(e, options))?;
    trace!(len, "encoded_length");
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::{boxed::Box, collections::BTreeMap, string::String};
    #[cfg(feature = "std")]
    use std::{boxed::Box, collections::BTreeMap, string::String};

    use hex_literal::hex;
    use proptest::prelude::*;

    use crate::{decode, DecodeOptions, Tag, ValueKind};

    fn mixed_key() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            (-1000i32..1000).prop_map(|n| Value::from(f64::from(n) + 0.5)),
            any::<bool>().prop_map(Value::Bool),
            Just(Value::Null),
            Just(Value::Undefined),
            "[a-z]{0,4}".prop_map(Value::from),
        ]
    }

    fn enc(value: &Value) -> Vec<u8> {
        encode(value, &EncodeOptions::default()).unwrap()
    }

    #[test]
    fn integers() {
        assert_eq!(enc(&Value::Int(0)), hex!("00"));
        assert_eq!(enc(&Value::Int(23)), hex!("17"));
        assert_eq!(enc(&Value::Int(24)), hex!("1818"));
        assert_eq!(enc(&Value::Int(-1)), hex!("20"));
        assert_eq!(enc(&Value::Int(-24)), hex!("37"));
        assert_eq!(enc(&Value::Int(-25)), hex!("3818"));
        assert_eq!(enc(&Value::Int(i64::MIN)), hex!("3b7fffffffffffffff"));
        assert_eq!(
            enc(&Value::BigInt(i128::from(u64::MAX))),
            hex!("1bffffffffffffffff")
        );
        assert_eq!(
            enc(&Value::BigInt(-18_446_744_073_709_551_616)),
            hex!("3bffffffffffffffff")
        );

        let err = encode(&Value::BigInt(1 << 64), &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IntegerOutOfRange(1 << 64));
        assert_eq!(
            err.to_string(),
            "CBOR encode error: encountered BigInt larger than allowable range (18446744073709551616)"
        );
        let err = encode(&Value::BigInt(-(1 << 64) - 1), &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::IntegerOutOfRange(_)));
    }

    #[test]
    fn canonical_key_order() {
        let value = Value::Map(vec![
            (Value::from("aa"), Value::Int(0)),
            (Value::Array(vec![]), Value::Int(1)),
            (Value::Int(-1), Value::Int(2)),
            (Value::from("b"), Value::Int(3)),
            (Value::Int(100), Value::Int(4)),
            (Value::from(&b"z"[..]), Value::Int(5)),
            (Value::Bool(false), Value::Int(6)),
            (Value::Int(10), Value::Int(7)),
            (Value::Int(-100), Value::Int(8)),
        ]);
        assert_eq!(
            enc(&value),
            hex!(
                "a9"
                "0a07"
                "186404"
                "2002"
                "386308"
                "417a05"
                "616203"
                "62616100"
                "8001"
                "f406"
            )
        );
    }

    #[test]
    fn simple_and_float_keys() {
        let forward = Value::Map(vec![
            (Value::from(1.5), Value::Null),
            (Value::Bool(false), Value::Null),
            (Value::from(2.5), Value::Null),
        ]);
        let backward = Value::Map(vec![
            (Value::from(2.5), Value::Null),
            (Value::Bool(false), Value::Null),
            (Value::from(1.5), Value::Null),
        ]);
        assert_eq!(enc(&forward), hex!("a3f4f6f93e00f6f94100f6"));
        assert_eq!(enc(&backward), enc(&forward));

        let value = Value::Map(vec![
            (Value::from(-0.5), Value::Int(0)),
            (Value::Undefined, Value::Int(1)),
            (Value::Null, Value::Int(2)),
            (Value::Bool(true), Value::Int(3)),
        ]);
        assert_eq!(enc(&value), hex!("a4f503f602f701f9b80000"));
    }

    #[test]
    fn object_keys_sort_by_length_first() {
        let mut object = BTreeMap::new();
        object.insert(String::from("bb"), Value::Int(1));
        object.insert(String::from("a"), Value::Int(2));
        object.insert(String::from("c"), Value::Int(3));
        assert_eq!(
            enc(&Value::Object(object)),
            hex!("a361610261630362626201")
        );
    }

    #[test]
    fn unsorted_maps_keep_order() {
        let opts = EncodeOptions {
            map_sorter: None,
            ..EncodeOptions::default()
        };
        let value = Value::Map(vec![
            (Value::Int(2), Value::Null),
            (Value::Int(1), Value::Null),
        ]);
        assert_eq!(encode(&value, &opts).unwrap(), hex!("a202f601f6"));
    }

    #[test]
    fn break_tokens() {
        let opts = EncodeOptions {
            add_break_tokens: true,
            ..EncodeOptions::default()
        };
        let value = Value::Array(vec![Value::Int(1), Value::Map(vec![])]);
        assert_eq!(encode(&value, &opts).unwrap(), hex!("9f01bfffff"));
        let decoded = decode(&hex!("9f01bfffff"), &DecodeOptions {
            use_maps: true,
            ..DecodeOptions::default()
        })
        .unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn floats() {
        assert_eq!(enc(&Value::from(0.5)), hex!("f93800"));
        assert_eq!(enc(&Value::from(1.1)), hex!("fb3ff199999999999a"));
        let opts = EncodeOptions {
            float64: true,
            ..EncodeOptions::default()
        };
        assert_eq!(
            encode(&Value::from(0.5), &opts).unwrap(),
            hex!("fb3fe0000000000000")
        );
    }

    #[test]
    fn tags_and_simple_values() {
        let value = Value::Tag(Tag::new(1, Box::new(Value::Int(1_363_896_240))));
        assert_eq!(enc(&value), hex!("c11a514b67b0"));
        assert_eq!(enc(&Value::Undefined), hex!("f7"));
        assert_eq!(enc(&Value::Null), hex!("f6"));
        assert_eq!(enc(&Value::Bool(true)), hex!("f5"));
    }

    #[test]
    fn quick_encode_matches_buffered_path() {
        let slow = EncodeOptions {
            quick_encode: false,
            ..EncodeOptions::default()
        };
        for value in [
            Value::Int(0),
            Value::Int(-24),
            Value::from(""),
            Value::from(&b""[..]),
            Value::Array(vec![]),
            Value::Object(BTreeMap::new()),
            Value::Undefined,
        ] {
            assert_eq!(enc(&value), encode(&value, &slow).unwrap(), "{value:?}");
            assert_eq!(enc(&value).len(), 1);
        }
    }

    #[test]
    fn cycles_are_rejected() {
        let shared = Value::shared(Value::Array(vec![Value::Int(1)]));
        let Value::Shared(rc) = &shared else {
            unreachable!()
        };
        rc.borrow_mut()
            .as_array_mut()
            .unwrap()
            .push(shared.clone());

        let err = encode(&shared, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CircularReference);
        assert_eq!(
            err.to_string(),
            "CBOR encode error: object contains circular references"
        );

        // break the cycle so the allocation is freed
        rc.borrow_mut().as_array_mut().unwrap().pop();
    }

    #[test]
    fn siblings_may_share() {
        let shared = Value::shared(Value::from("x"));
        let value = Value::Array(vec![shared.clone(), Value::Array(vec![shared])]);
        assert_eq!(enc(&value), hex!("826178816178"));
    }

    #[test]
    fn type_encoders_override_and_fall_through() {
        let opts = EncodeOptions::default()
            .with_type_encoder(ValueKind::Text, |value, _, _, _| {
                Ok(value.as_str().filter(|s| s.starts_with("0x")).map(|s| {
                    TokenTree::Seq(vec![Token::tag(42).into(), Token::text(s[2..].into()).into()])
                }))
            });
        let value = Value::Array(vec![Value::from("0xab"), Value::from("cd")]);
        assert_eq!(
            encode(&value, &opts).unwrap(),
            hex!("82d82a626162626364")
        );
    }

    #[test]
    fn encode_into_fixed_buffer() {
        let value = Value::Array(vec![Value::Int(1), Value::from("ab")]);
        let mut dest = [0u8; 8];
        let len = encode_into(&value, &mut dest, &EncodeOptions::default()).unwrap();
        assert_eq!(&dest[..len], hex!("8201626162"));

        let mut small = [0u8; 3];
        let err = encode_into(&value, &mut small, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::BufferTooSmall);

        // single byte values are written too
        let mut one = [0xffu8; 1];
        assert_eq!(encode_into(&Value::Null, &mut one, &EncodeOptions::default()).unwrap(), 1);
        assert_eq!(one, [0xf6]);
    }

    #[test]
    fn reused_buffer() {
        let mut buf = Bl::with_chunk_size(4);
        encode_to(&Value::from("hello"), &mut buf, &EncodeOptions::default()).unwrap();
        encode_to(&Value::Int(1000), &mut buf, &EncodeOptions::default()).unwrap();
        assert_eq!(buf.to_bytes(true), hex!("6568656c6c6f1903e8"));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            Just(Value::Undefined),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            any::<u64>().prop_map(Value::from),
            any::<f64>()
                .prop_filter("NaN is not equal to itself", |f| !f.is_nan())
                .prop_map(Value::from),
            ".{0,8}".prop_map(Value::TextStr),
            proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                proptest::collection::btree_map(".{0,4}", inner, 0..6).prop_map(Value::Object),
            ]
        })
    }

    proptest! {
        #[test]
        fn round_trip(value in arb_value()) {
            let bytes = enc(&value);
            let strict = DecodeOptions { strict: true, ..DecodeOptions::default() };
            prop_assert_eq!(decode(&bytes, &strict).unwrap(), value.clone());
            prop_assert_eq!(
                encoded_length(&value, &EncodeOptions::default()).unwrap(),
                bytes.len()
            );
        }

        #[test]
        fn key_order_is_independent_of_insertion(
            entries in proptest::collection::btree_map(any::<i32>(), any::<bool>(), 0..12)
        ) {
            let forward: Vec<_> = entries
                .iter()
                .map(|(k, v)| (Value::from(*k), Value::Bool(*v)))
                .collect();
            let mut backward = forward.clone();
            backward.reverse();
            prop_assert_eq!(enc(&Value::Map(forward)), enc(&Value::Map(backward)));
        }

        #[test]
        fn mixed_key_order_is_independent_of_insertion(
            (entries, shuffled) in proptest::collection::btree_set(mixed_key(), 0..12)
                .prop_flat_map(|keys| {
                    let entries: Vec<_> = keys
                        .into_iter()
                        .zip(0i64..)
                        .map(|(k, i)| (k, Value::Int(i)))
                        .collect();
                    (Just(entries.clone()), Just(entries).prop_shuffle())
                })
        ) {
            prop_assert_eq!(enc(&Value::Map(entries)), enc(&Value::Map(shuffled)));
        }
    }
}
