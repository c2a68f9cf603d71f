//! Represents CBOR data.

use core::{cell::RefCell, fmt::Display};

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{boxed::Box, collections::BTreeMap, fmt, rc::Rc, str::FromStr, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{boxed::Box, collections::BTreeMap, fmt, rc::Rc, str::FromStr, string::String, vec::Vec};

use ordered_float::OrderedFloat;

use crate::{error::Error, ByteString, Tag};

mod index;

pub use index::Index;

/// Newtype struct for a float
///
/// `OrderedFloat` is used internally but is not guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Float(OrderedFloat<f64>);

impl Float {
    /// Returns the underlying value.
    #[inline]
    #[must_use]
    pub fn get(self) -> f64 {
        self.0 .0
    }
}

impl Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<f32> for Float {
    fn from(v: f32) -> Self {
        Float(OrderedFloat(f64::from(v)))
    }
}

impl From<f64> for Float {
    fn from(v: f64) -> Self {
        Float(OrderedFloat(v))
    }
}

impl From<Float> for f64 {
    fn from(value: Float) -> Self {
        value.get()
    }
}

/// The category of a [`Value`].
///
/// Keys the type encoder table of [`EncodeOptions`][crate::EncodeOptions].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ValueKind {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Bool,
    /// Integer in the `i64` range
    Int,
    /// Integer outside the `i64` range
    BigInt,
    /// Float
    Float,
    /// Byte string
    Bytes,
    /// Text string
    Text,
    /// Array
    Array,
    /// Map with text keys
    Object,
    /// Map with keys of any type, in insertion order
    Map,
    /// Tagged content
    Tag,
}

/// Represents a CBOR item.
///
/// Maps decode to [`Value::Object`] unless
/// [`DecodeOptions::use_maps`][crate::DecodeOptions::use_maps] is set, in which
/// case they decode to [`Value::Map`] and keep the original key types and
/// order.
///
/// [`Value::Shared`] lets one node appear in several places of a tree. A node
/// which contains itself can be built this way; such a value is rejected by
/// the encoder, and must not be compared or formatted with `Debug`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Integer in the `i64` range
    Int(i64),
    /// Integer in `-2^64..2^64` outside the `i64` range
    BigInt(i128),
    /// Float value
    Float(Float),
    /// A byte string
    ByteStr(ByteString),
    /// A UTF-8 string
    TextStr(String),
    /// Array of values
    Array(Vec<Value>),
    /// Map with text keys
    Object(BTreeMap<String, Value>),
    /// Map with keys of any type
    Map(Vec<(Value, Value)>),
    /// Tag with a number and content
    Tag(Tag<Box<Value>>),
    /// A node which may be referenced from several places
    Shared(Rc<RefCell<Value>>),
}

impl Value {
    /// Wraps a value into a [`Value::Shared`] node.
    #[must_use]
    pub fn shared(value: Value) -> Self {
        Value::Shared(Rc::new(RefCell::new(value)))
    }

    /// Returns the category of the value.
    ///
    /// Looks through [`Value::Shared`] nodes. A node which is mutably
    /// borrowed reports [`ValueKind::Undefined`].
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::Float(_) => ValueKind::Float,
            Value::ByteStr(_) => ValueKind::Bytes,
            Value::TextStr(_) => ValueKind::Text,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Map(_) => ValueKind::Map,
            Value::Tag(_) => ValueKind::Tag,
            Value::Shared(shared) => shared
                .try_borrow()
                .map_or(ValueKind::Undefined, |v| v.kind()),
        }
    }

    /// Returns true if the value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if the value is `undefined`.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// If the value is a boolean, returns the underlying value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer in the `i64` range, returns the underlying value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a non-negative integer, returns the underlying value.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(n) => u64::try_from(*n).ok(),
            Value::BigInt(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// If the value is an integer of any size, returns the underlying value.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(n) => Some(i128::from(*n)),
            Value::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a float, returns the underlying value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.get()),
            _ => None,
        }
    }

    /// If the value is a byte string, returns a reference to the underlying value.
    #[must_use]
    pub fn as_byte_str(&self) -> Option<&ByteString> {
        match self {
            Value::ByteStr(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a byte string, returns a mutable reference to the underlying value.
    #[must_use]
    pub fn as_byte_str_mut(&mut self) -> Option<&mut ByteString> {
        match self {
            Value::ByteStr(ref mut b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a UTF-8 string, returns a reference to the underlying value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::TextStr(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to the underlying value.
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(ref l) => Some(l),
            _ => None,
        }
    }

    /// If the value is an array, returns a mutable reference to the underlying value.
    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(ref mut l) => Some(l),
            _ => None,
        }
    }

    /// If the value is a text keyed map, returns a reference to the underlying value.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// If the value is a text keyed map, returns a mutable reference to the underlying value.
    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Object(ref mut o) => Some(o),
            _ => None,
        }
    }

    /// If the value is a map with keys of any type, returns a reference to the
    /// entries.
    #[must_use]
    pub fn as_map(&self) -> Option<&Vec<(Value, Value)>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// If the value is a map with keys of any type, returns a mutable
    /// reference to the entries.
    #[must_use]
    pub fn as_map_mut(&mut self) -> Option<&mut Vec<(Value, Value)>> {
        match self {
            Value::Map(ref mut m) => Some(m),
            _ => None,
        }
    }

    /// If the value is a tag, returns a reference to the underlying value.
    #[must_use]
    pub fn as_tag(&self) -> Option<&Tag<Box<Value>>> {
        match self {
            Value::Tag(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true if the value is a byte string.
    #[must_use]
    pub fn is_byte_str(&self) -> bool {
        self.as_byte_str().is_some()
    }

    /// Returns true if the value is a UTF-8 string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.as_str().is_some()
    }

    /// Returns true if the value is an integer in the `i64` range.
    #[must_use]
    pub fn is_i64(&self) -> bool {
        self.as_i64().is_some()
    }

    /// Returns true if the value is a non-negative integer which fits a [u64].
    #[must_use]
    pub fn is_u64(&self) -> bool {
        self.as_u64().is_some()
    }

    /// Returns true if the value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.as_array().is_some()
    }

    /// Returns true if the value is a text keyed map.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.as_object().is_some()
    }

    /// Returns true if the value is a map with keys of any type.
    #[must_use]
    pub fn is_map(&self) -> bool {
        self.as_map().is_some()
    }

    /// Used to get a reference to a value with an index.
    #[inline]
    pub fn get<I: Index>(&self, index: I) -> Option<&Value> {
        index.index(self)
    }

    /// Used to get a mutable reference to a value with an index.
    #[inline]
    pub fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Value> {
        index.index_mut(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct DebugTextStr<'a>(&'a str);

        impl fmt::Debug for DebugTextStr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple("TextStr").field(&self.0).finish()
            }
        }

        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(arg0) => f.debug_tuple("Bool").field(arg0).finish(),
            Value::Int(arg0) => f.debug_tuple("Int").field(arg0).finish(),
            Value::BigInt(arg0) => f.debug_tuple("BigInt").field(arg0).finish(),
            Value::Float(arg0) => f.debug_tuple("Float").field(&arg0.get()).finish(),
            Value::ByteStr(arg0) => f.debug_tuple("ByteStr").field(arg0).finish(),
            Value::TextStr(arg0) => fmt::Debug::fmt(&DebugTextStr(arg0), f),
            Value::Array(arg0) => f.debug_tuple("Array").field(arg0).finish(),
            Value::Object(arg0) => f.debug_tuple("Object").field(arg0).finish(),
            Value::Map(arg0) => f.debug_tuple("Map").field(arg0).finish(),
            Value::Tag(arg0) => f
                .debug_tuple("Tag")
                .field(&arg0.num())
                .field(arg0.content())
                .finish(),
            Value::Shared(arg0) => match arg0.try_borrow() {
                Ok(v) => f.debug_tuple("Shared").field(&*v).finish(),
                Err(_) => f.write_str("Shared(<borrowed>)"),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or_else(|_| Value::BigInt(i128::from(v)), Value::Int)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

/// Values in the `i64` range become [`Value::Int`], others [`Value::BigInt`].
///
/// The encoder rejects big integers outside `-2^64..2^64`.
impl From<i128> for Value {
    fn from(v: i128) -> Self {
        i64::try_from(v).map_or(Value::BigInt(v), Value::Int)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(Float::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(Float::from(v))
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Value::TextStr(String::from(s)))
    }
}

impl<'a> From<&'a str> for Value {
    fn from(other: &'a str) -> Value {
        Value::TextStr(String::from(other))
    }
}

impl From<String> for Value {
    fn from(other: String) -> Value {
        Value::TextStr(other)
    }
}

impl<'a> From<&'a [u8]> for Value {
    fn from(other: &'a [u8]) -> Value {
        Value::ByteStr(ByteString::from(other))
    }
}

impl From<Vec<u8>> for Value {
    fn from(other: Vec<u8>) -> Value {
        Value::ByteStr(ByteString::from(other))
    }
}

impl From<ByteString> for Value {
    fn from(other: ByteString) -> Value {
        Value::ByteStr(other)
    }
}

impl From<Vec<Value>> for Value {
    fn from(other: Vec<Value>) -> Value {
        Value::Array(other)
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(other: BTreeMap<String, V>) -> Value {
        Value::Object(other.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(other: Vec<(Value, Value)>) -> Value {
        Value::Map(other)
    }
}

impl From<Tag<Value>> for Value {
    fn from(other: Tag<Value>) -> Value {
        let num = other.num();
        Value::Tag(Tag::new(num, Box::new(other.into_content())))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(other: Option<T>) -> Value {
        other.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::{format, vec};
    #[cfg(feature = "std")]
    use std::{format, vec};

    #[test]
    fn integer_conversions() {
        assert_eq!(Value::from(7u8), Value::Int(7));
        assert_eq!(Value::from(-7i32), Value::Int(-7));
        assert_eq!(Value::from(u64::MAX), Value::BigInt(i128::from(u64::MAX)));
        assert_eq!(Value::from(i128::from(i64::MIN)), Value::Int(i64::MIN));
        assert_eq!(
            Value::from(i128::from(i64::MIN) - 1),
            Value::BigInt(i128::from(i64::MIN) - 1)
        );
        assert_eq!(Value::from(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Value::from(-1i64).as_u64(), None);
        assert_eq!(Value::from(-1i64).as_i128(), Some(-1));
    }

    #[test]
    fn kinds() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from("a").kind(), ValueKind::Text);
        assert_eq!(Value::from(&b"a"[..]).kind(), ValueKind::Bytes);
        assert_eq!(Value::shared(Value::Array(vec![])).kind(), ValueKind::Array);
        assert_eq!(ValueKind::BigInt.to_string(), "big_int");
        let name: &'static str = ValueKind::Object.into();
        assert_eq!(name, "object");
    }

    #[test]
    fn option_and_iter() {
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
        let v: Value = [1u8, 2, 3].into_iter().collect();
        assert_eq!(v, Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn debug_format() {
        let v = Value::Array(vec![
            Value::from("a"),
            Value::from(&[1u8, 2][..]),
            Value::Tag(Tag::new(1, Box::new(Value::Null))),
        ]);
        assert_eq!(
            format!("{v:?}"),
            r#"Array([TextStr("a"), ByteStr(h'0102'), Tag(1, Null)])"#
        );
    }
}
