//! A single key/value binding inside a [`Store`](crate::Store).

use std::borrow::Cow;

use memstore_value::Value;
use serde::{Deserialize, Serialize};

/// One key/value binding plus its immutability flag.
///
/// Entries live in exactly one store slot; the store hands out references
/// or clones but never shares a slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub(crate) key: String,
    pub(crate) value: Value,
    pub(crate) immutable: bool,
}

impl Entry {
    /// Create a detached entry.
    pub fn new(key: impl Into<String>, value: impl Into<Value>, immutable: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            immutable,
        }
    }

    /// The entry's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` if the entry was last written through the immutable path.
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// The stored value exactly as written, with no defensive copy.
    ///
    /// This bypasses immutability: if a sealed entry holds a
    /// [`Value::Shared`], the returned handle is the live one and writes
    /// through it change what later reads observe. Use [`Entry::value`]
    /// for the sealed view.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// The entry's value, respecting immutability.
    ///
    /// A mutable entry returns its value as stored, so a [`Value::Shared`]
    /// handle still aliases whatever the caller passed in. An immutable
    /// entry returns a detached copy: indirections are dereferenced and
    /// sequences and maps are freshly allocated.
    pub fn value(&self) -> Cow<'_, Value> {
        if self.immutable {
            self.value.detach()
        } else {
            Cow::Borrowed(&self.value)
        }
    }

    /// Mutable access to the stored value. `None` for immutable entries.
    pub fn value_mut(&mut self) -> Option<&mut Value> {
        if self.immutable {
            None
        } else {
            Some(&mut self.value)
        }
    }

    /// Split the entry into key, value and flag.
    pub fn into_parts(self) -> (String, Value, bool) {
        (self.key, self.value, self.immutable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memstore_value::SharedValue;

    #[test]
    fn mutable_entry_borrows_value() {
        let entry = Entry::new("k", vec![1i32, 2], false);
        assert!(matches!(entry.value(), Cow::Borrowed(_)));
    }

    #[test]
    fn immutable_entry_copies_list() {
        let entry = Entry::new("k", vec![1i32, 2], true);
        let mut first = entry.value().into_owned();
        let second = entry.value().into_owned();
        if let Value::List(items) = &mut first {
            items.clear();
        }
        assert_eq!(second, Value::from(vec![1i32, 2]));
        assert_eq!(entry.raw(), &Value::from(vec![1i32, 2]));
    }

    #[test]
    fn mutable_entry_shares_indirection() {
        let handle = SharedValue::new(10i64);
        let entry = Entry::new("k", handle.clone(), false);
        handle.set(11i64);
        match entry.value().as_ref() {
            Value::Shared(stored) => assert_eq!(stored.get(), Value::Int64(11)),
            other => panic!("expected shared value, got {other:?}"),
        }
    }

    #[test]
    fn immutable_entry_dereferences_indirection() {
        let handle = SharedValue::new(10i64);
        let entry = Entry::new("k", handle.clone(), true);
        let read = entry.value().into_owned();
        assert_eq!(read, Value::Int64(10));
    }

    #[test]
    fn raw_keeps_live_handle_of_sealed_entry() {
        let handle = SharedValue::new(1i32);
        let entry = Entry::new("k", handle.clone(), true);

        match entry.raw() {
            Value::Shared(inner) => assert!(inner.ptr_eq(&handle)),
            other => panic!("expected shared value, got {other:?}"),
        }
        assert_eq!(entry.value().into_owned(), Value::Int(1));

        handle.set(2i32);
        assert_eq!(entry.value().into_owned(), Value::Int(2));
    }

    #[test]
    fn value_mut_only_for_mutable_entries() {
        let mut mutable = Entry::new("a", 1i32, false);
        *mutable.value_mut().unwrap() = Value::Int(2);
        assert_eq!(mutable.raw(), &Value::Int(2));

        let mut sealed = Entry::new("b", 1i32, true);
        assert!(sealed.value_mut().is_none());
    }

    #[test]
    fn into_parts() {
        let (key, value, immutable) = Entry::new("k", "v", true).into_parts();
        assert_eq!(key, "k");
        assert_eq!(value, Value::from("v"));
        assert!(immutable);
    }
}
