use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Shared reference to an external collaborator (callback handler, key
/// store, security domain, factory closure...).
///
/// Collaborators are opaque, so a [`Handle`] is equal to another handle only
/// when both point at the same allocation, and hashes by address. Cloning a
/// handle keeps it equal to the original.
pub struct Handle<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Handle<T> {
    /// Wraps an existing shared collaborator.
    pub fn from_arc(inner: Arc<T>) -> Self {
        Self(inner)
    }

    /// Returns the shared collaborator.
    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }

    fn address(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl<T> Handle<T> {
    /// Moves `value` behind a new handle.
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ?Sized> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.address() as usize).hash(state);
    }
}

impl<T: ?Sized> Debug for Handle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({:p})", self.address())
    }
}

impl<T: ?Sized> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized> From<Arc<T>> for Handle<T> {
    fn from(inner: Arc<T>) -> Self {
        Self(inner)
    }
}
