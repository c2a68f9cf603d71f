//! Tokens exchanged between the decoding and encoding stages.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

use core::{cmp::Ordering, fmt};

/// Describes the kind of a [`Token`].
///
/// Major types 0 through 6 each have a single descriptor. Major type 7 is
/// shared by floats and the fixed simple values, so those descriptors are told
/// apart by name.
///
/// Two descriptors are equal if their major type and name are equal.
#[derive(Clone, Copy, Debug, Eq)]
pub struct Type {
    major: u8,
    name: &'static str,
    terminal: bool,
}

impl Type {
    /// Unsigned integer (major type 0)
    pub const UINT: Type = Type::new(0, "uint", true);
    /// Negative integer (major type 1)
    pub const NEGINT: Type = Type::new(1, "negint", true);
    /// Byte string (major type 2)
    pub const BYTES: Type = Type::new(2, "bytes", true);
    /// Text string (major type 3)
    pub const STRING: Type = Type::new(3, "string", true);
    /// Array (major type 4)
    pub const ARRAY: Type = Type::new(4, "array", false);
    /// Map (major type 5)
    pub const MAP: Type = Type::new(5, "map", false);
    /// Tag (major type 6)
    pub const TAG: Type = Type::new(6, "tag", false);
    /// Half, single or double precision float (major type 7)
    pub const FLOAT: Type = Type::new(7, "float", true);
    /// Simple value `false`
    pub const FALSE: Type = Type::new(7, "false", true);
    /// Simple value `true`
    pub const TRUE: Type = Type::new(7, "true", true);
    /// Simple value `null`
    pub const NULL: Type = Type::new(7, "null", true);
    /// Simple value `undefined`
    pub const UNDEFINED: Type = Type::new(7, "undefined", true);
    /// Break marker ending an indefinite length container
    pub const BREAK: Type = Type::new(7, "break", true);

    const fn new(major: u8, name: &'static str, terminal: bool) -> Self {
        Self {
            major,
            name,
            terminal,
        }
    }

    /// The major type (0-7).
    #[inline]
    #[must_use]
    pub const fn major(&self) -> u8 {
        self.major
    }

    /// The major type shifted into the high 3 bits of an initial byte.
    #[inline]
    #[must_use]
    pub const fn major_encoded(&self) -> u8 {
        self.major << 5
    }

    /// The name of the type.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if a token of this type is a complete value.
    ///
    /// Arrays, maps and tags are followed by child tokens.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Orders types by major type.
    #[inline]
    #[must_use]
    pub fn compare(&self, other: &Type) -> Ordering {
        self.major.cmp(&other.major)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major && self.name == other.name
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type[{}].{}", self.major, self.name)
    }
}

/// The value carried by a [`Token`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    /// No value (`null`, `undefined` and break)
    None,
    /// Boolean value of `true` and `false`
    Bool(bool),
    /// An unsigned integer, a container entry count or a tag number
    Uint(u64),
    /// A negative integer in `-2^64..=-1`
    Negint(i128),
    /// A float
    Float(f64),
    /// Byte string content
    Bytes(Vec<u8>),
    /// Text string content
    Text(String),
    /// An indefinite length array or map
    Indefinite,
}

/// A single CBOR data item header, or a complete leaf item.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    typ: Type,
    value: TokenValue,
    encoded_length: usize,
    byte_value: Option<Vec<u8>>,
}

impl Token {
    /// Constructs a token with an unknown encoded length.
    #[must_use]
    pub fn new(typ: Type, value: TokenValue) -> Self {
        Self {
            typ,
            value,
            encoded_length: 0,
            byte_value: None,
        }
    }

    #[must_use]
    pub(crate) fn with_length(typ: Type, value: TokenValue, encoded_length: usize) -> Self {
        Self {
            typ,
            value,
            encoded_length,
            byte_value: None,
        }
    }

    /// Unsigned integer token.
    #[must_use]
    pub fn uint(value: u64) -> Self {
        Self::new(Type::UINT, TokenValue::Uint(value))
    }

    /// Negative integer token.
    #[must_use]
    pub fn negint(value: i128) -> Self {
        Self::new(Type::NEGINT, TokenValue::Negint(value))
    }

    /// Byte string token.
    #[must_use]
    pub fn bytes(value: Vec<u8>) -> Self {
        Self::new(Type::BYTES, TokenValue::Bytes(value))
    }

    /// Text string token.
    #[must_use]
    pub fn text(value: String) -> Self {
        Self::new(Type::STRING, TokenValue::Text(value))
    }

    /// Array header with the number of elements which follow.
    #[must_use]
    pub fn array(len: u64) -> Self {
        Self::new(Type::ARRAY, TokenValue::Uint(len))
    }

    /// Map header with the number of entries which follow.
    #[must_use]
    pub fn map(len: u64) -> Self {
        Self::new(Type::MAP, TokenValue::Uint(len))
    }

    /// Tag header with the tag number.
    #[must_use]
    pub fn tag(num: u64) -> Self {
        Self::new(Type::TAG, TokenValue::Uint(num))
    }

    /// Float token.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::new(Type::FLOAT, TokenValue::Float(value))
    }

    /// `true` or `false` token.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        if value {
            Self::new(Type::TRUE, TokenValue::Bool(true))
        } else {
            Self::new(Type::FALSE, TokenValue::Bool(false))
        }
    }

    /// `null` token.
    #[must_use]
    pub fn null() -> Self {
        Self::new(Type::NULL, TokenValue::None)
    }

    /// `undefined` token.
    #[must_use]
    pub fn undefined() -> Self {
        Self::new(Type::UNDEFINED, TokenValue::None)
    }

    /// Retains the raw bytes a text token was decoded from.
    #[must_use]
    pub(crate) fn with_byte_value(mut self, byte_value: Vec<u8>) -> Self {
        self.byte_value = Some(byte_value);
        self
    }

    /// The type of the token.
    #[inline]
    #[must_use]
    pub fn typ(&self) -> Type {
        self.typ
    }

    /// The value of the token.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Consumes the token and returns its value.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> TokenValue {
        self.value
    }

    /// Number of bytes the token occupied in the decoded input.
    ///
    /// For tokens built for encoding, the value is `0`.
    #[inline]
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        self.encoded_length
    }

    /// The raw bytes of a decoded text token, if retained.
    #[inline]
    #[must_use]
    pub fn byte_value(&self) -> Option<&[u8]> {
        self.byte_value.as_deref()
    }

    /// The encoded payload of a byte or text string token.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            TokenValue::Bytes(b) => Some(b),
            TokenValue::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// The unsigned integer, entry count or tag number of the token.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.value {
            TokenValue::Uint(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true for the header of an indefinite length array or map.
    #[must_use]
    pub fn is_indefinite(&self) -> bool {
        self.value == TokenValue::Indefinite
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token[{}].{:?}", self.typ, self.value)
    }
}

/// A token or a nested sequence of tokens.
///
/// Containers encode to their header token followed by the trees of their
/// children.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenTree {
    /// A single token
    Leaf(Token),
    /// A sequence of trees
    Seq(Vec<TokenTree>),
}

impl TokenTree {
    /// The first token in depth-first order.
    #[must_use]
    pub fn first(&self) -> Option<&Token> {
        match self {
            TokenTree::Leaf(token) => Some(token),
            TokenTree::Seq(seq) => seq.iter().find_map(TokenTree::first),
        }
    }

    /// Returns the token if the tree is exactly one token.
    #[must_use]
    pub fn as_single(&self) -> Option<&Token> {
        match self {
            TokenTree::Leaf(token) => Some(token),
            TokenTree::Seq(seq) if seq.len() == 1 => seq[0].as_single(),
            TokenTree::Seq(_) => None,
        }
    }

    /// Visits every token in depth-first order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error returned by `f`.
    pub fn try_for_each<E, F>(&self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&Token) -> Result<(), E>,
    {
        match self {
            TokenTree::Leaf(token) => f(token),
            TokenTree::Seq(seq) => seq.iter().try_for_each(|tree| tree.try_for_each(f)),
        }
    }
}

impl From<Token> for TokenTree {
    fn from(value: Token) -> Self {
        TokenTree::Leaf(value)
    }
}

impl From<Vec<TokenTree>> for TokenTree {
    fn from(value: Vec<TokenTree>) -> Self {
        TokenTree::Seq(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::{string::ToString, vec};
    #[cfg(feature = "std")]
    use std::{string::ToString, vec};

    #[test]
    fn type_equality_is_by_value() {
        let copy = Type::new(7, "null", true);
        assert_eq!(copy, Type::NULL);
        assert_ne!(Type::NULL, Type::UNDEFINED);
        assert_ne!(Type::UINT, Type::NEGINT);
    }

    #[test]
    fn type_fields() {
        assert_eq!(Type::MAP.major_encoded(), 0xa0);
        assert_eq!(Type::BREAK.major_encoded(), 0xe0);
        assert!(!Type::ARRAY.is_terminal());
        assert!(!Type::TAG.is_terminal());
        assert!(Type::FLOAT.is_terminal());
        assert_eq!(Type::BYTES.to_string(), "Type[2].bytes");
    }

    #[test]
    fn type_compare_is_by_major() {
        assert_eq!(Type::UINT.compare(&Type::NEGINT), Ordering::Less);
        assert_eq!(Type::FALSE.compare(&Type::FLOAT), Ordering::Equal);
        assert_eq!(Type::MAP.compare(&Type::STRING), Ordering::Greater);
    }

    #[test]
    fn tree_first_and_single() {
        let tree = TokenTree::Seq(vec![
            TokenTree::Seq(vec![]),
            TokenTree::Seq(vec![Token::array(1).into(), Token::uint(1).into()]),
        ]);
        assert_eq!(tree.first(), Some(&Token::array(1)));
        assert_eq!(tree.as_single(), None);

        let single = TokenTree::Seq(vec![TokenTree::Seq(vec![Token::null().into()])]);
        assert_eq!(single.as_single(), Some(&Token::null()));
    }

    #[test]
    fn tree_visits_in_order() {
        let tree = TokenTree::Seq(vec![
            Token::map(1).into(),
            TokenTree::Seq(vec![Token::text("a".to_string()).into()]),
            Token::bool(true).into(),
        ]);
        let mut majors = vec![];
        tree.try_for_each(&mut |t: &Token| -> Result<(), ()> {
            majors.push(t.typ().major());
            Ok(())
        })
        .unwrap();
        assert_eq!(majors, [5, 3, 7]);
    }
}
