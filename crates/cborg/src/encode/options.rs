//! Encode configuration.

use core::{cmp::Ordering, fmt};

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{borrow::Cow, collections::BTreeMap, sync::Arc};
#[cfg(feature = "std")]
use std::{borrow::Cow, collections::BTreeMap, sync::Arc};

use crate::{
    common::ENCODE_ERR_PREFIX,
    token::TokenTree,
    value::{Value, ValueKind},
    Result,
};

use super::{map_sorter, Ref};

/// Orders the encoded `(key, value)` entries of a map.
pub type MapSorter =
    Arc<dyn Fn(&(TokenTree, TokenTree), &(TokenTree, TokenTree)) -> Ordering + Send + Sync>;

/// Produces the tokens of a value in place of the built-in handling of its
/// [`ValueKind`].
///
/// Returning `Ok(None)` falls through to the built-in handling. The encoder
/// may call [`object_to_tokens`][super::object_to_tokens] with the given
/// options and ancestor chain to encode nested values.
pub type TypeEncoder = Arc<
    dyn Fn(&Value, ValueKind, &EncodeOptions, Option<&Ref<'_>>) -> Result<Option<TokenTree>>
        + Send
        + Sync,
>;

/// Options for [`encode`][crate::encode] and the other encode entry points.
#[derive(Clone)]
pub struct EncodeOptions {
    /// Write every float as a 64 bit double instead of the narrowest exact
    /// width.
    pub float64: bool,
    /// Write arrays and maps with indefinite length headers closed by a
    /// break marker.
    pub add_break_tokens: bool,
    /// Sorts map entries before they are written. `None` keeps the order of
    /// the value.
    pub map_sorter: Option<MapSorter>,
    /// Overrides of the token production for value kinds.
    pub type_encoders: BTreeMap<ValueKind, TypeEncoder>,
    /// Return values which encode to a single byte without building a
    /// buffer.
    pub quick_encode: bool,
    /// Prefix of error messages.
    pub encode_err_prefix: Cow<'static, str>,
}

impl EncodeOptions {
    /// Registers a type encoder for a value kind.
    #[must_use]
    pub fn with_type_encoder<F>(mut self, kind: ValueKind, encoder: F) -> Self
    where
        F: Fn(&Value, ValueKind, &EncodeOptions, Option<&Ref<'_>>) -> Result<Option<TokenTree>>
            + Send
            + Sync
            + 'static,
    {
        self.type_encoders.insert(kind, Arc::new(encoder));
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            float64: false,
            add_break_tokens: false,
            map_sorter: Some(Arc::new(map_sorter)),
            type_encoders: BTreeMap::new(),
            quick_encode: true,
            encode_err_prefix: Cow::Borrowed(ENCODE_ERR_PREFIX),
        }
    }
}

impl fmt::Debug for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeOptions")
            .field("float64", &self.float64)
            .field("add_break_tokens", &self.add_break_tokens)
            .field("map_sorter", &self.map_sorter.is_some())
            .field("type_encoders", &self.type_encoders.keys())
            .field("quick_encode", &self.quick_encode)
            .field("encode_err_prefix", &self.encode_err_prefix)
            .finish()
    }
}
