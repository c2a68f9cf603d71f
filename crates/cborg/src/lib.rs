//! # cborg
//!
//! cborg is a library which decodes and encodes in the [Concise Binary
//! Object Representation (CBOR)][cbor] data format. CBOR is specified in [RFC
//! 8949][rfc_8949]. Imagine starting with the JSON data model, making it more
//! efficient by using a binary (instead of plain text) format, and adding some
//! extensibility to allow more types.
//!
//! Data is processed as a flat stream of [`Token`]s. Decoding splits the input
//! into tokens with a [`Tokenizer`] and assembles them into a [`Value`].
//! Encoding turns a [`Value`] into a [`TokenTree`] and writes it out. The
//! default encode options produce deterministic output: the shortest exact
//! form of every integer, length and float, and map entries in canonical
//! order.
//!
//! ```
//! use cborg::{DecodeOptions, EncodeOptions, Value};
//!
//! let value: Value = [("a", Value::Int(1)), ("b", Value::from(vec![Value::Int(2), Value::Int(3)]))]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_owned(), v))
//!     .collect::<std::collections::BTreeMap<_, _>>()
//!     .into();
//! let bytes = cborg::encode(&value, &EncodeOptions::default())?;
//! assert_eq!(bytes, [0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x82, 0x02, 0x03]);
//! assert_eq!(cborg::decode(&bytes, &DecodeOptions::default())?, value);
//! # Ok::<(), cborg::Error>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of [Apache License, Version 2.0][LICENSE_APACHE] or [MIT
//! License][LICENSE_MIT] at your option.
//!
//! ### Contributions
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.
//!
//! [LICENSE_APACHE]: LICENSE-APACHE
//! [LICENSE_MIT]: LICENSE-MIT
//! [cbor]: https://cbor.io/
//! [rfc_8949]: https://www.rfc-editor.org/rfc/rfc8949.html

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

mod bstring;
mod buf;
pub mod bytes;
mod common;
mod decode;
mod diagnostic;
mod encode;
mod error;
mod jump;
mod major;
mod read;
pub mod tag;
mod token;
mod value;

#[doc(inline)]
pub use bstring::ByteString;
#[doc(inline)]
pub use buf::{Bl, Buffer, SliceBuf, DEFAULT_CHUNK_SIZE};
#[doc(inline)]
pub use common::{DECODE_ERR_PREFIX, ENCODE_ERR_PREFIX};
#[doc(inline)]
pub use decode::{decode, decode_first, decode_tokens, DecodeOptions, TagContent, TagDecoder};
#[doc(inline)]
pub use diagnostic::{from_diag, tokens_to_diagnostic, Diagnostic, DEFAULT_WIDTH};
#[doc(inline)]
pub use encode::{
    encode, encode_into, encode_to, encoded_length, map_sorter, object_to_tokens,
    tokens_to_encoded, EncodeOptions, MapSorter, Ref, TypeEncoder,
};
#[doc(inline)]
pub use error::{Error, ErrorKind, Missing, Result};
#[doc(inline)]
pub use read::{TokenRead, Tokenizer};
#[doc(inline)]
pub use tag::Tag;
#[doc(inline)]
pub use token::{Token, TokenTree, TokenValue, Type};
#[doc(inline)]
pub use value::{Float, Index, Value, ValueKind};
