//! Tagged content.

/// Tag number
pub type Num = u64;

/// Tag number and content.
///
/// [`Value::Tag`][crate::Value::Tag] holds the result of a registered tag
/// decoder which chose to keep the tag, and encodes as the tag number
/// followed by the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag<T> {
    num: Num,
    content: T,
}

impl<T> Tag<T> {
    /// Construct a new tag.
    #[inline]
    #[must_use]
    pub const fn new(num: Num, content: T) -> Self {
        Self { num, content }
    }

    /// Return the tag content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Return a mutable reference to the tag content.
    #[inline]
    #[must_use]
    pub fn content_mut(&mut self) -> &mut T {
        &mut self.content
    }

    /// Consumes the tag and returns the content.
    #[inline]
    #[must_use]
    pub fn into_content(self) -> T {
        self.content
    }

    /// Return the tag number.
    #[inline]
    #[must_use]
    pub fn num(&self) -> Num {
        self.num
    }
}
