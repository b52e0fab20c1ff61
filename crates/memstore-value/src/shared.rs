use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// An aliasable indirection to a [`Value`].
///
/// Cloning a `SharedValue` clones the handle, not the referent: every clone
/// observes mutations made through any other. A store holding a mutable
/// entry hands the handle back as-is; an immutable entry hands back the
/// dereferenced referent instead.
///
/// Serialization writes the referent only. Aliasing between handles is not
/// preserved across a snapshot, and reference cycles are not supported.
#[derive(Clone)]
pub struct SharedValue(Rc<RefCell<Value>>);

impl SharedValue {
    /// Wrap a value behind a new shared handle.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Rc::new(RefCell::new(value.into())))
    }

    /// A by-value copy of the referent.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Replace the referent, returning the previous value.
    pub fn set(&self, value: impl Into<Value>) -> Value {
        self.0.replace(value.into())
    }

    /// Borrow the referent.
    ///
    /// # Panics
    ///
    /// Panics if the referent is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    /// Mutably borrow the referent.
    ///
    /// # Panics
    ///
    /// Panics if the referent is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point at the same referent.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedValue").field(&*self.0.borrow()).finish()
    }
}

impl Serialize for SharedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.borrow().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SharedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SharedValue::new)
    }
}
