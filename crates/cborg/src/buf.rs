//! Buffers for storing encoded data.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use core::mem;

use crate::{Error, ErrorKind, Result};

/// Default size of a [`Bl`] chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Byte runs shorter than this are copied into a fresh chunk instead of
/// becoming a chunk of their own.
const SMALL_PUSH: usize = 64;

/// Buffer for storing data.
///
/// The trait is an abstraction to allow different types of buffers to exist. In
/// some cases, a growable buffer could be used, but in other cases, a fixed size
/// destination may be used.
pub trait Buffer {
    /// Clears the existing contents of the buffer.
    fn clear(&mut self);

    /// Returns the number of bytes written so far.
    fn len(&self) -> usize;

    /// Returns true if the buffer is empty, false otherwise.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends bytes to the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be pushed to the buffer. Nothing is
    /// written in that case.
    fn push(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<B> Buffer for &mut B
where
    B: Buffer + ?Sized,
{
    #[inline]
    fn clear(&mut self) {
        (**self).clear();
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn push(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).push(bytes)
    }
}

impl Buffer for Vec<u8> {
    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn push(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// A growable list of byte chunks.
///
/// Pushed bytes are appended to the last chunk while it has room. Short runs
/// which do not fit start a new chunk of [`chunk_size`][Bl::with_chunk_size]
/// capacity; long runs are stored as their own chunk. The contiguous output is
/// only assembled by [`Bl::to_bytes`].
///
/// The first chunk is kept across resets so a buffer reused for sequential
/// encodes avoids reallocating.
#[derive(Debug, Clone)]
pub struct Bl {
    chunk_size: usize,
    chunks: Vec<Vec<u8>>,
    len: usize,
    reuse: Option<Vec<u8>>,
}

impl Default for Bl {
    fn default() -> Self {
        Self::new()
    }
}

impl Bl {
    /// Constructs an empty buffer with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs an empty buffer with the given chunk size.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunks: Vec::new(),
            len: 0,
            reuse: None,
        }
    }

    /// Number of chunks currently held.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drops all written bytes, keeping the first chunk's allocation.
    pub fn reset(&mut self) {
        let mut chunks = mem::take(&mut self.chunks).into_iter();
        if let Some(mut first) = chunks.next() {
            if first.capacity() >= self.chunk_size {
                first.clear();
                self.reuse = Some(first);
            }
        }
        self.len = 0;
    }

    /// Returns the written bytes as one contiguous vector.
    ///
    /// If `reset` is true the buffer is emptied afterwards.
    #[must_use]
    pub fn to_bytes(&mut self, reset: bool) -> Vec<u8> {
        let bytes = if reset && self.chunks.len() == 1 {
            // Hand out the only chunk instead of copying it
            self.chunks.pop().unwrap_or_default()
        } else {
            let mut bytes = Vec::with_capacity(self.len);
            for chunk in &self.chunks {
                bytes.extend_from_slice(chunk);
            }
            bytes
        };
        if reset {
            self.reset();
        }
        bytes
    }
}

impl Buffer for Bl {
    #[inline]
    fn clear(&mut self) {
        self.reset();
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(last) = self.chunks.last_mut() {
            if last.capacity() - last.len() >= bytes.len() {
                last.extend_from_slice(bytes);
                self.len += bytes.len();
                return Ok(());
            }
        }

        if bytes.len() < SMALL_PUSH && bytes.len() < self.chunk_size {
            let mut chunk = self
                .reuse
                .take()
                .unwrap_or_else(|| Vec::with_capacity(self.chunk_size));
            chunk.extend_from_slice(bytes);
            self.chunks.push(chunk);
        } else {
            self.chunks.push(Vec::from(bytes));
        }
        self.len += bytes.len();
        Ok(())
    }
}

/// Buffer represented by a fixed sized slice.
///
/// Writing past the end of the slice fails with
/// [`ErrorKind::BufferTooSmall`]; the slice never grows.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct SliceBuf<'a> {
    reserved: &'a mut [u8],
    len: usize,
}

impl<'a> SliceBuf<'a> {
    /// Wraps the destination slice. Writing starts at its beginning.
    #[must_use]
    pub fn new(reserved: &'a mut [u8]) -> Self {
        Self { reserved, len: 0 }
    }

    /// Returns the written part of the slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.reserved[..self.len]
    }
}

impl Buffer for SliceBuf<'_> {
    #[inline]
    fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn push(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.len + bytes.len();
        if end > self.reserved.len() {
            return Err(Error::new(ErrorKind::BufferTooSmall, self.len));
        }

        self.reserved[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}
