use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    rc::Rc,
};

/// Shared handle to an externally owned resource.
///
/// Equality and hashing use pointer identity: two separately constructed resources that
/// compare equal structurally are still distinct references, while clones of one handle are
/// the same reference.
pub struct ResourceRef<T: ?Sized>(Rc<T>);

impl<T> ResourceRef<T> {
    /// Move `value` into a fresh handle.
    pub fn new(value: T) -> Self {
        Self(Rc::new(value))
    }
}

impl<T: ?Sized> ResourceRef<T> {
    /// Wrap an existing `Rc`; clones of it stay the same reference.
    pub fn from_rc(rc: Rc<T>) -> Self {
        Self(rc)
    }

    /// Address used as the identity key.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Identity comparison.
    pub fn same(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Underlying shared pointer.
    pub fn as_rc(&self) -> &Rc<T> {
        &self.0
    }
}

impl<T: ?Sized> Clone for ResourceRef<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ResourceRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::same(self, other)
    }
}

impl<T: ?Sized> Eq for ResourceRef<T> {}

impl<T: ?Sized> Hash for ResourceRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized> Deref for ResourceRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> fmt::Debug for ResourceRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceRef")
            .field(&format_args!("{:#x}", self.addr()))
            .finish()
    }
}

impl<T: ?Sized> From<Rc<T>> for ResourceRef<T> {
    fn from(rc: Rc<T>) -> Self {
        Self(rc)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/handle.rs"]
mod tests;
