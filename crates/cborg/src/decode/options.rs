//! Decode configuration.

use core::fmt;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{borrow::Cow, collections::BTreeMap, sync::Arc};
#[cfg(feature = "std")]
use std::{borrow::Cow, collections::BTreeMap, sync::Arc};

use crate::{common::DECODE_ERR_PREFIX, tag::Num, Result, Value};

use super::TagContent;

/// Builds a value from the content of a tag.
///
/// The decoder reads the tagged content through [`TagContent::decode`] or
/// [`TagContent::entries`].
pub type TagDecoder = Arc<dyn Fn(&mut TagContent<'_>) -> Result<Value> + Send + Sync>;

/// Options for [`decode`][crate::decode] and the other decode entry points.
///
/// ```
/// use cborg::DecodeOptions;
///
/// let options = DecodeOptions {
///     strict: true,
///     allow_undefined: false,
///     ..DecodeOptions::default()
/// };
/// # let _ = options;
/// ```
#[derive(Clone)]
#[expect(clippy::struct_excessive_bools)]
pub struct DecodeOptions {
    /// Reject integers, lengths and tag numbers which are not encoded in
    /// their minimal width.
    pub strict: bool,
    /// Accept indefinite length arrays and maps.
    pub allow_indefinite: bool,
    /// Accept `undefined`.
    pub allow_undefined: bool,
    /// Decode `undefined` as `null`.
    pub coerce_undefined_to_null: bool,
    /// Accept infinite floats.
    pub allow_infinity: bool,
    /// Accept NaN floats.
    pub allow_nan: bool,
    /// Accept integers outside the `i64` range.
    pub allow_big_int: bool,
    /// Decode maps into [`Value::Map`], keeping the key types and order,
    /// instead of [`Value::Object`].
    pub use_maps: bool,
    /// Reject maps which repeat a key.
    pub reject_duplicate_map_keys: bool,
    /// Keep the raw bytes of text strings on their tokens.
    pub retain_string_bytes: bool,
    /// Decoders for tag numbers. A tag without a decoder is an error.
    pub tags: BTreeMap<Num, TagDecoder>,
    /// Prefix of error messages.
    pub decode_err_prefix: Cow<'static, str>,
}

impl DecodeOptions {
    /// Registers a decoder for a tag number.
    #[must_use]
    pub fn with_tag<F>(mut self, num: Num, decoder: F) -> Self
    where
        F: Fn(&mut TagContent<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.tags.insert(num, Arc::new(decoder));
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            allow_indefinite: true,
            allow_undefined: true,
            coerce_undefined_to_null: false,
            allow_infinity: true,
            allow_nan: true,
            allow_big_int: true,
            use_maps: false,
            reject_duplicate_map_keys: false,
            retain_string_bytes: false,
            tags: BTreeMap::new(),
            decode_err_prefix: Cow::Borrowed(DECODE_ERR_PREFIX),
        }
    }
}

impl fmt::Debug for DecodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeOptions")
            .field("strict", &self.strict)
            .field("allow_indefinite", &self.allow_indefinite)
            .field("allow_undefined", &self.allow_undefined)
            .field("coerce_undefined_to_null", &self.coerce_undefined_to_null)
            .field("allow_infinity", &self.allow_infinity)
            .field("allow_nan", &self.allow_nan)
            .field("allow_big_int", &self.allow_big_int)
            .field("use_maps", &self.use_maps)
            .field("reject_duplicate_map_keys", &self.reject_duplicate_map_keys)
            .field("retain_string_bytes", &self.retain_string_bytes)
            .field("tags", &self.tags.keys())
            .field("decode_err_prefix", &self.decode_err_prefix)
            .finish()
    }
}
