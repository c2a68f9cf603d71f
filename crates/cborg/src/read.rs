//! [`TokenRead`] trait and the slice backed [`Tokenizer`].

use crate::{
    decode::DecodeOptions,
    error::{Error, ErrorKind, Result},
    jump::{JUMP, QUICK},
    token::Token,
};

/// A source of tokens for the decoder.
///
/// [`decode_tokens`][crate::decode_tokens] pulls tokens from a reader until
/// one complete item is assembled, so a reader can be reused to decode
/// consecutive items.
pub trait TokenRead {
    /// Returns true when no more tokens are available.
    fn done(&self) -> bool;

    /// Consumes and returns the next token.
    ///
    /// # Errors
    ///
    /// Returns an error if the next item is malformed or rejected by the
    /// decode options.
    fn next_token(&mut self) -> Result<Token>;

    /// Returns the byte offset of the next token.
    fn pos(&self) -> usize;
}

impl<T> TokenRead for &mut T
where
    T: TokenRead + ?Sized,
{
    #[inline]
    fn done(&self) -> bool {
        (**self).done()
    }

    #[inline]
    fn next_token(&mut self) -> Result<Token> {
        (**self).next_token()
    }

    #[inline]
    fn pos(&self) -> usize {
        (**self).pos()
    }
}

/// Reads tokens from a byte slice.
///
/// The leading byte of each item selects its decode function from a 256 entry
/// table.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a, 'o> {
    data: &'a [u8],
    pos: usize,
    options: &'o DecodeOptions,
}

impl<'a, 'o> Tokenizer<'a, 'o> {
    /// Instantiates a new tokenizer positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8], options: &'o DecodeOptions) -> Self {
        Tokenizer {
            data,
            pos: 0,
            options,
        }
    }

    /// Returns the bytes which have not been tokenized yet.
    #[must_use]
    pub fn remainder(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }
}

impl TokenRead for Tokenizer<'_, '_> {
    #[inline]
    fn done(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn next_token(&mut self) -> Result<Token> {
        let Some(&byte) = self.data.get(self.pos) else {
            return Err(Error::new(ErrorKind::NotEnoughData, self.pos));
        };
        let index = usize::from(byte);
        let token = match QUICK[index] {
            Some(quick) => quick.token(),
            None => JUMP[index](self.data, self.pos, byte & 0x1f, self.options)
                .map_err(|e| e.or_byte_offset(self.pos))?,
        };
        self.pos += token.encoded_length();
        Ok(token)
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }
}
