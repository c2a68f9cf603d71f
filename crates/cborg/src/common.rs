//! Constants and bounds checks shared by the codecs.

use crate::{Error, ErrorKind, Result};

/// Default prefix of decode error messages.
pub const DECODE_ERR_PREFIX: &str = "CBOR decode error:";

/// Default prefix of encode error messages.
pub const ENCODE_ERR_PREFIX: &str = "CBOR encode error:";

/// Smallest values which do not fit into the immediately smaller width.
///
/// Index 0 is the first value which needs a following byte, then the first
/// which needs 2, 4 and 8 following bytes. The last entry (`2^64`) is one past
/// the largest encodable argument.
pub(crate) const UINT_BOUNDARIES: [u128; 5] = [24, 1 << 8, 1 << 16, 1 << 32, 1 << 64];

/// Minor values 24 through 27 announce an argument in the following bytes.
pub(crate) const MINOR_U8: u8 = 24;
pub(crate) const MINOR_U16: u8 = 25;
pub(crate) const MINOR_U32: u8 = 26;
pub(crate) const MINOR_U64: u8 = 27;
pub(crate) const MINOR_INDEFINITE: u8 = 31;

/// Total bytes (initial byte included) for an argument of the given minor.
#[inline]
pub(crate) const fn prefix_bytes(minor: u8) -> usize {
    match minor {
        MINOR_U8 => 2,
        MINOR_U16 => 3,
        MINOR_U32 => 5,
        MINOR_U64 => 9,
        _ => 1,
    }
}

/// Errors unless `need` bytes are available from `pos`.
#[inline]
pub(crate) fn assert_enough_data(data: &[u8], pos: usize, need: usize) -> Result<()> {
    if data.len().saturating_sub(pos) < need {
        Err(Error::new(ErrorKind::NotEnoughData, pos))
    } else {
        Ok(())
    }
}
