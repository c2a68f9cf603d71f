//! Decoder for CBOR data.
//!
//! A [`Tokenizer`] splits the input into [`Token`]s and the builder in this
//! module assembles them into a [`Value`] tree. Policy decisions which only
//! need a single item (strict widths, indefinite lengths, `undefined`, NaN,
//! big integers) are enforced by the tokenizer; the builder enforces the
//! container level ones (key types, duplicate keys, tags).
//!
//! Maps decode to [`Value::Object`] and require text keys unless
//! [`DecodeOptions::use_maps`] is set. Tags are resolved through
//! [`DecodeOptions::tags`]:
//!
//! ```
//! use cborg::{DecodeOptions, Tag, Value};
//!
//! let options = DecodeOptions::default()
//!     .with_tag(1, |content| Ok(Value::Tag(Tag::new(1, Box::new(content.decode()?)))));
//! let value = cborg::decode(&[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0], &options)?;
//! assert_eq!(value.as_tag().map(|t| t.num()), Some(1));
//! # Ok::<(), cborg::Error>(())
//! ```

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{collections::BTreeMap, format, vec::Vec};
#[cfg(feature = "std")]
use std::{collections::BTreeMap, format, vec::Vec};

use tracing::{debug, trace};

use crate::{
    error::{Error, ErrorKind, Missing, Result},
    major::invalid_token,
    read::{TokenRead, Tokenizer},
    tag::Num,
    token::{Token, TokenValue, Type},
    ByteString, Value,
};

mod options;

pub use options::{DecodeOptions, TagDecoder};

/// Upper bound on the number of entries allocated up front for a container.
const MAX_PREALLOC: usize = 4096;

/// The result of reading one item from a token source.
enum Item {
    Value(Value),
    Break,
    Done,
}

/// The content of a tag, handed to a [`TagDecoder`].
///
/// The decoder reads the content with [`decode`][TagContent::decode] or, for
/// a map whose keys must keep their types, with
/// [`entries`][TagContent::entries]. Content which the decoder does not read
/// is decoded and discarded afterwards.
pub struct TagContent<'a> {
    num: Num,
    tokens: &'a mut dyn TokenRead,
    options: &'a DecodeOptions,
    consumed: bool,
}

impl TagContent<'_> {
    /// Returns the tag number.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Num {
        self.num
    }

    /// Returns the options of the running decode.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        self.options
    }

    fn take(&mut self) -> Result<()> {
        if self.consumed {
            return Err(Error::custom(format_args!(
                "content of tag {} was already read",
                self.num
            )));
        }
        self.consumed = true;
        Ok(())
    }

    /// Decodes the tagged item.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed, missing, or was already
    /// read.
    pub fn decode(&mut self) -> Result<Value> {
        self.take()?;
        let pos = self.tokens.pos();
        match next_item(self.tokens, self.options)? {
            Item::Value(value) => Ok(value),
            Item::Break => Err(Error::new(ErrorKind::UnexpectedBreak, pos)),
            Item::Done => Err(Error::new(ErrorKind::NotEnoughData, pos)),
        }
    }

    /// Decodes the tagged map into its entries, keeping keys of every type
    /// in their encoded order.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a map, is malformed, or was
    /// already read.
    pub fn entries(&mut self) -> Result<Vec<(Value, Value)>> {
        self.take()?;
        let pos = self.tokens.pos();
        if self.tokens.done() {
            return Err(Error::new(ErrorKind::NotEnoughData, pos));
        }
        let token = self.tokens.next_token()?;
        if token.typ() != Type::MAP {
            return Err(Error::new(
                ErrorKind::Custom(format!(
                    "tag {} expects map content, found {}",
                    self.num,
                    token.typ()
                )),
                pos,
            ));
        }
        let mut entries = Vec::new();
        read_entries(self.tokens, &token, self.options, false, |key, value| {
            entries.push((key, value));
            Ok(())
        })?;
        Ok(entries)
    }
}

impl core::fmt::Debug for TagContent<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TagContent")
            .field("num", &self.num)
            .field("pos", &self.tokens.pos())
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

#[inline]
fn capacity_hint(len: u64) -> usize {
    usize::try_from(len).map_or(MAX_PREALLOC, |len| len.min(MAX_PREALLOC))
}

fn next_item(tokens: &mut dyn TokenRead, options: &DecodeOptions) -> Result<Item> {
    if tokens.done() {
        return Ok(Item::Done);
    }
    let pos = tokens.pos();
    let token = tokens.next_token()?;
    let typ = token.typ();
    if typ == Type::BREAK {
        return Ok(Item::Break);
    }

    let value = if typ == Type::ARRAY {
        decode_array(tokens, &token, options)?
    } else if typ == Type::MAP {
        decode_map(tokens, &token, options)?
    } else if typ == Type::TAG {
        let num = token.as_u64().ok_or_else(|| invalid_token(&token))?;
        decode_tag(tokens, num, pos, options)?
    } else {
        terminal_value(token)?
    };
    Ok(Item::Value(value))
}

fn terminal_value(token: Token) -> Result<Value> {
    if token.typ() == Type::UNDEFINED {
        return Ok(Value::Undefined);
    }
    if token.is_indefinite() {
        return Err(invalid_token(&token));
    }
    Ok(match token.into_value() {
        TokenValue::Uint(n) => Value::from(n),
        TokenValue::Negint(n) => Value::from(n),
        TokenValue::Bytes(b) => Value::ByteStr(ByteString::from(b)),
        TokenValue::Text(s) => Value::TextStr(s),
        TokenValue::Float(f) => Value::from(f),
        TokenValue::Bool(b) => Value::Bool(b),
        TokenValue::None | TokenValue::Indefinite => Value::Null,
    })
}

fn decode_array(
    tokens: &mut dyn TokenRead,
    token: &Token,
    options: &DecodeOptions,
) -> Result<Value> {
    let Some(len) = token.as_u64() else {
        let mut arr = Vec::new();
        loop {
            match next_item(tokens, options)? {
                Item::Value(value) => arr.push(value),
                Item::Break => return Ok(Value::Array(arr)),
                Item::Done => return Err(Error::new(ErrorKind::NotEnoughData, tokens.pos())),
            }
        }
    };

    let mut arr = Vec::with_capacity(capacity_hint(len));
    for got in 0..len {
        let pos = tokens.pos();
        match next_item(tokens, options)? {
            Item::Value(value) => arr.push(value),
            Item::Break => {
                return Err(Error::new(
                    ErrorKind::UnexpectedBreakInContainer("array"),
                    pos,
                ))
            }
            Item::Done => {
                return Err(Error::new(
                    ErrorKind::NotEnoughEntries {
                        container: "array",
                        got,
                        expected: len,
                        missing: Missing::Element,
                    },
                    pos,
                ))
            }
        }
    }
    Ok(Value::Array(arr))
}

/// Reads the entries of the map whose header is `token`, handing each to `f`.
///
/// With `text_keys` set, a key which is not a text string is an error.
fn read_entries<F>(
    tokens: &mut dyn TokenRead,
    token: &Token,
    options: &DecodeOptions,
    text_keys: bool,
    mut f: F,
) -> Result<()>
where
    F: FnMut(Value, Value) -> Result<()>,
{
    let len = token.as_u64();
    let missing = |got: u64, missing: Missing, pos: usize| match len {
        Some(expected) => Error::new(
            ErrorKind::NotEnoughEntries {
                container: "map",
                got,
                expected,
                missing,
            },
            pos,
        ),
        None => Error::new(ErrorKind::NotEnoughData, pos),
    };

    let mut got = 0;
    while len.map_or(true, |len| got < len) {
        let pos = tokens.pos();
        let key = match next_item(tokens, options)? {
            Item::Value(key) => key,
            Item::Break if len.is_none() => break,
            Item::Break => {
                return Err(Error::new(ErrorKind::UnexpectedBreakInContainer("map"), pos))
            }
            Item::Done => return Err(missing(got, Missing::Key, pos)),
        };
        if text_keys && !key.is_string() {
            return Err(Error::new(ErrorKind::NonTextKey(key.kind()), pos));
        }

        let pos = tokens.pos();
        let value = match next_item(tokens, options)? {
            Item::Value(value) => value,
            Item::Break => {
                return Err(Error::new(ErrorKind::UnexpectedBreakInContainer("map"), pos))
            }
            Item::Done => return Err(missing(got, Missing::Value, pos)),
        };
        f(key, value).map_err(|e| e.or_byte_offset(pos))?;
        got += 1;
    }
    Ok(())
}

fn duplicate_key(key: &Value) -> Error {
    let key = match key {
        Value::TextStr(s) => s.clone(),
        key => format!("{key:?}"),
    };
    Error::with_kind(ErrorKind::DuplicateKey(key))
}

fn decode_map(tokens: &mut dyn TokenRead, token: &Token, options: &DecodeOptions) -> Result<Value> {
    if options.use_maps {
        let mut entries: Vec<(Value, Value)> =
            Vec::with_capacity(token.as_u64().map_or(0, capacity_hint));
        // Position of each key in `entries`
        let mut index: BTreeMap<Value, usize> = BTreeMap::new();
        read_entries(tokens, token, options, false, |key, value| {
            match index.get(&key) {
                Some(_) if options.reject_duplicate_map_keys => return Err(duplicate_key(&key)),
                Some(&i) => entries[i].1 = value,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
            Ok(())
        })?;
        return Ok(Value::Map(entries));
    }

    let mut object = BTreeMap::new();
    read_entries(tokens, token, options, true, |key, value| {
        let Value::TextStr(key) = key else {
            return Err(Error::with_kind(ErrorKind::NonTextKey(key.kind())));
        };
        if options.reject_duplicate_map_keys && object.contains_key(&key) {
            return Err(Error::with_kind(ErrorKind::DuplicateKey(key)));
        }
        object.insert(key, value);
        Ok(())
    })?;
    Ok(Value::Object(object))
}

fn decode_tag(
    tokens: &mut dyn TokenRead,
    num: Num,
    pos: usize,
    options: &DecodeOptions,
) -> Result<Value> {
    let decoder = options
        .tags
        .get(&num)
        .ok_or_else(|| Error::new(ErrorKind::TagNotSupported(num), pos))?;
    let mut content = TagContent {
        num,
        tokens,
        options,
        consumed: false,
    };
    let value = decoder(&mut content).map_err(|e| e.or_byte_offset(pos))?;
    if !content.consumed {
        content.decode()?;
    }
    Ok(value)
}

fn fail(error: Error, options: &DecodeOptions) -> Error {
    let error = error.or_prefix(&options.decode_err_prefix);
    debug!(%error, "decode failed");
    error
}

/// Decodes the next complete item from a token source.
///
/// The source is left positioned after the item, so consecutive calls decode
/// consecutive items of a CBOR sequence.
///
/// # Errors
///
/// Returns [`ErrorKind::NoContent`] if the source is exhausted,
/// [`ErrorKind::UnexpectedBreak`] if the next token is a break marker, and
/// any error raised while decoding the item.
pub fn decode_tokens<T>(tokens: &mut T, options: &DecodeOptions) -> Result<Value>
where
    T: TokenRead,
{
    let pos = tokens.pos();
    match next_item(tokens, options) {
        Ok(Item::Value(value)) => Ok(value),
        Ok(Item::Break) => Err(fail(Error::new(ErrorKind::UnexpectedBreak, pos), options)),
        Ok(Item::Done) => Err(fail(Error::new(ErrorKind::NoContent, pos), options)),
        Err(e) => Err(fail(e, options)),
    }
}

/// Decodes the first item of `data` and returns it with the bytes which
/// follow it.
///
/// # Errors
///
/// Returns an error if `data` is empty or does not start with a complete,
/// valid item.
pub fn decode_first<'a>(data: &'a [u8], options: &DecodeOptions) -> Result<(Value, &'a [u8])> {
    trace!(len = data.len(), "decode_first");
    let mut tokens = Tokenizer::new(data, options);
    let value = decode_tokens(&mut tokens, options)?;
    Ok((value, tokens.remainder()))
}

/// Decodes `data`, which must hold exactly one item.
///
/// # Errors
///
/// Returns an error if `data` is not a single complete, valid item,
/// including [`ErrorKind::TrailingData`] when bytes follow the item.
pub fn decode(data: &[u8], options: &DecodeOptions) -> Result<Value> {
    trace!(len = data.len(), "decode");
    let mut tokens = Tokenizer::new(data, options);
    let value = decode_tokens(&mut tokens, options)?;
    let remaining = tokens.remainder().len();
    if remaining > 0 {
        return Err(fail(
            Error::new(ErrorKind::TrailingData(remaining), tokens.pos()),
            options,
        ));
    }
    Ok(value)
}
