//! Possible crate errors.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{
    borrow::Cow,
    boxed::Box,
    string::{String, ToString},
};
#[cfg(feature = "std")]
use std::{borrow::Cow, boxed::Box, string::String};

use core::{
    error,
    fmt::{self, Display},
    result,
};

use crate::value::ValueKind;

/// Alias for a [`Result`][std::result::Result] with a [`cborg::Error`][Error] error type.
pub type Result<T> = result::Result<T, Error>;

/// Errors during encoding and decoding.
pub struct Error {
    inner: Box<ErrorImpl>,
}

impl Error {
    /// Constructs an error with the kind and the byte offset where the error
    /// was detected.
    ///
    /// A byte offset value of `0` indicates that the byte offset is either
    /// unknown or not relevant.
    #[must_use]
    #[inline]
    pub fn new(kind: ErrorKind, byte_offset: usize) -> Self {
        Self {
            inner: Box::new(ErrorImpl {
                kind,
                byte_offset,
                prefix: None,
            }),
        }
    }

    #[must_use]
    #[inline]
    pub(crate) fn with_kind(kind: ErrorKind) -> Self {
        Self::new(kind, 0)
    }

    /// Constructs a free-form error.
    ///
    /// Intended for tag decoders and type encoders which need to reject their
    /// input.
    #[must_use]
    pub fn custom<T: Display>(msg: T) -> Self {
        Self::with_kind(ErrorKind::Custom(msg.to_string()))
    }

    /// Constructs an error rejecting a runtime value category.
    ///
    /// Type encoders use this to forbid a category the built-in encoder would
    /// otherwise accept (e.g. `undefined` in strictly JSON-compatible data).
    #[must_use]
    pub fn unsupported_type(kind: ValueKind) -> Self {
        Self::with_kind(ErrorKind::UnsupportedType(kind))
    }

    /// Sets the message prefix if one has not already been set.
    #[must_use]
    pub(crate) fn or_prefix(mut self, prefix: &Cow<'static, str>) -> Self {
        if self.inner.prefix.is_none() {
            self.inner.prefix = Some(prefix.clone());
        }
        self
    }

    /// Sets the byte offset if it is not yet known.
    #[must_use]
    pub(crate) fn or_byte_offset(mut self, byte_offset: usize) -> Self {
        if self.inner.byte_offset == 0 {
            self.inner.byte_offset = byte_offset;
        }
        self
    }

    /// The kind of error encountered
    #[must_use]
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    /// The byte offset where the error was detected.
    ///
    /// A byte offset value of `0` indicates that the byte offset is either
    /// unknown or not relevant.
    #[must_use]
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.inner.byte_offset
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        let byte_offset = match err {
            hex::FromHexError::InvalidHexCharacter { index, .. } => index,
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => 0,
        };
        Error::new(ErrorKind::InvalidDiagnostic, byte_offset)
    }
}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, error.to_string())
    }
}

struct ErrorImpl {
    kind: ErrorKind,
    byte_offset: usize,
    prefix: Option<Cow<'static, str>>,
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix} ")?;
        }
        if self.byte_offset == 0 {
            Display::fmt(&self.kind, f)
        } else {
            write!(f, "{} at byte offset {}", self.kind, self.byte_offset)
        }
    }
}

impl fmt::Debug for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("byte_offset", &self.byte_offset)
            .finish()
    }
}

/// Which part of a length-prefixed container was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// An array element.
    Element,
    /// A map key.
    Key,
    /// A map value.
    Value,
}

/// All possible crate errors.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input was empty.
    NoContent,
    /// A break marker appeared outside of an indefinite length container.
    UnexpectedBreak,
    /// A break marker appeared inside a container with a declared length.
    UnexpectedBreakInContainer(&'static str),
    /// Fewer bytes remain than the item declares.
    NotEnoughData,
    /// Input ran out before a container received its declared entries.
    NotEnoughEntries {
        /// `"array"` or `"map"`
        container: &'static str,
        /// Number of complete entries decoded
        got: u64,
        /// Declared number of entries
        expected: u64,
        /// The part which was missing
        missing: Missing,
    },
    /// An integer or length used more bytes than necessary (strict mode).
    OverlongEncoding,
    /// Indefinite length item while indefinite lengths are disallowed.
    IndefiniteNotAllowed,
    /// Indefinite length byte and text strings are never supported.
    UnsupportedIndefiniteString,
    /// `undefined` while undefined values are disallowed.
    UndefinedNotAllowed,
    /// `NaN` while NaN values are disallowed.
    NanNotAllowed,
    /// `Infinity` or `-Infinity` while infinite values are disallowed.
    InfinityNotAllowed,
    /// A non-text key while decoding into a text keyed object.
    NonTextKey(ValueKind),
    /// A repeated map key while duplicate keys are rejected.
    DuplicateKey(String),
    /// A tag number without a registered decoder.
    TagNotSupported(u64),
    /// An integer outside of the 64-bit signed range while big integers are
    /// disallowed.
    BigIntNotAllowed,
    /// Unparsed trailing data after the top-level value.
    TrailingData(usize),
    /// The low 5 bits of an initial byte are reserved for its major type.
    InvalidMinor {
        /// Major type (0-7)
        major: u8,
        /// Minor value (0-31)
        minor: u8,
    },
    /// Simple values other than false, true, null and undefined.
    UnsupportedSimpleValue(u8),
    /// A value category which cannot be encoded.
    UnsupportedType(ValueKind),
    /// A container contains itself.
    CircularReference,
    /// An integer magnitude outside of CBOR's `-2^64..2^64` range.
    IntegerOutOfRange(i128),
    /// The fixed destination buffer is too small.
    BufferTooSmall,
    /// Diagnostic text contains characters other than hex digits.
    InvalidDiagnostic,
    /// Error raised by a tag decoder or type encoder.
    Custom(String),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NoContent => f.write_str("did not find any content to decode"),
            ErrorKind::UnexpectedBreak => f.write_str("got unexpected break"),
            ErrorKind::UnexpectedBreakInContainer(container) => {
                write!(f, "got unexpected break to lengthed {container}")
            }
            ErrorKind::NotEnoughData => f.write_str("not enough data for type"),
            ErrorKind::NotEnoughEntries {
                container,
                got,
                expected,
                missing,
            } => match missing {
                Missing::Element => write!(
                    f,
                    "found {container} but not enough entries (got {got}, expected {expected})"
                ),
                Missing::Key => write!(
                    f,
                    "found {container} but not enough entries (got {got} [no key], expected {expected})"
                ),
                Missing::Value => write!(
                    f,
                    "found {container} but not enough entries (got {got} [no value], expected {expected})"
                ),
            },
            ErrorKind::OverlongEncoding => {
                f.write_str("integer encoded in more bytes than necessary (strict decode)")
            }
            ErrorKind::IndefiniteNotAllowed => f.write_str("indefinite length items not allowed"),
            ErrorKind::UnsupportedIndefiniteString => {
                f.write_str("indefinite length bytes/strings are not supported")
            }
            ErrorKind::UndefinedNotAllowed => f.write_str("undefined values are not supported"),
            ErrorKind::NanNotAllowed => f.write_str("NaN values are not supported"),
            ErrorKind::InfinityNotAllowed => f.write_str("Infinity values are not supported"),
            ErrorKind::NonTextKey(kind) => {
                write!(f, "non-string keys not supported (got {kind})")
            }
            ErrorKind::DuplicateKey(key) => write!(f, "found repeat map key \"{key}\""),
            ErrorKind::TagNotSupported(num) => write!(f, "tag not supported ({num})"),
            ErrorKind::BigIntNotAllowed => {
                f.write_str("integers outside of the safe integer range are not supported")
            }
            ErrorKind::TrailingData(remaining) => {
                write!(f, "too many terminals, data makes no sense:{remaining}")
            }
            ErrorKind::InvalidMinor { major, minor } => {
                write!(f, "encountered invalid minor ({minor}) for major {major}")
            }
            ErrorKind::UnsupportedSimpleValue(value) => {
                write!(f, "simple values are not supported ({value})")
            }
            ErrorKind::UnsupportedType(kind) => write!(f, "unsupported type: {kind}"),
            ErrorKind::CircularReference => f.write_str("object contains circular references"),
            ErrorKind::IntegerOutOfRange(value) => {
                write!(f, "encountered BigInt larger than allowable range ({value})")
            }
            ErrorKind::BufferTooSmall => {
                f.write_str("write out of bounds, destination buffer is too small")
            }
            ErrorKind::InvalidDiagnostic => {
                f.write_str("input string was not CBOR diagnostic format")
            }
            ErrorKind::Custom(msg) => f.write_str(msg),
        }
    }
}

impl error::Error for ErrorKind {}
