//! Ancestor chain used to reject values which contain themselves.

use crate::{Error, ErrorKind, Result};

/// A node of the chain of [`Value::Shared`][crate::Value::Shared] nodes
/// enclosing the value being encoded.
///
/// Each node lives on the stack frame which encodes the shared value, so the
/// chain always holds exactly the ancestors of the current position. A
/// shared node which appears twice as siblings is encoded twice.
#[derive(Debug, Clone, Copy)]
pub struct Ref<'a> {
    addr: *const (),
    parent: Option<&'a Ref<'a>>,
}

impl<'a> Ref<'a> {
    /// Returns true if `addr` is this node or one of its ancestors.
    #[must_use]
    pub fn includes(&self, addr: *const ()) -> bool {
        let mut node = Some(self);
        while let Some(r) = node {
            if r.addr == addr {
                return true;
            }
            node = r.parent;
        }
        false
    }

    /// Extends the chain `parent` with `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CircularReference`] if `addr` is already in the
    /// chain.
    pub fn create(addr: *const (), parent: Option<&'a Ref<'a>>) -> Result<Ref<'a>> {
        if parent.is_some_and(|p| p.includes(addr)) {
            return Err(Error::with_kind(ErrorKind::CircularReference));
        }
        Ok(Ref { addr, parent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_ancestors_only() {
        let (a, b, c) = (1u8, 2u8, 3u8);
        let addr = |v: &u8| core::ptr::from_ref(v).cast::<()>();

        let root = Ref::create(addr(&a), None).unwrap();
        let child = Ref::create(addr(&b), Some(&root)).unwrap();
        assert!(child.includes(addr(&a)));
        assert!(!child.includes(addr(&c)));

        let err = Ref::create(addr(&a), Some(&child)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CircularReference);

        // a sibling of `child` may reuse its address
        assert!(Ref::create(addr(&b), Some(&root)).is_ok());
    }
}
