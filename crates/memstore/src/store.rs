//! The ordered entry collection.

use std::borrow::Cow;

use memstore_value::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::entry::Entry;

/// An ordered collection of key/value entries with immutability support.
///
/// Entries keep their insertion order: updating a key rewrites its slot in
/// place, new keys append. Lookups are linear scans, which is the right
/// trade for the handful of values a request or session scope carries.
///
/// A store has a single owner and performs no locking. It is `!Send`
/// because values may hold [`SharedValue`](memstore_value::SharedValue)
/// handles; move a store across threads as a snapshot instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Store {
    entries: Vec<Entry>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Create an empty store from configuration.
    pub fn with_config(config: &StoreConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    pub(crate) fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Insert or update `key`.
    ///
    /// Returns the entry as it stands after the call and `true` if the key
    /// was newly appended. An existing key is updated in place and reported
    /// as `false`, with one exception: an immutable entry ignores a write
    /// with `immutable == false` and is returned unchanged.
    pub fn save(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        immutable: bool,
    ) -> (&Entry, bool) {
        let key = key.into();
        if let Some(index) = self.position(&key) {
            let entry = &mut self.entries[index];
            if entry.immutable && !immutable {
                debug!(key = %entry.key, "ignored plain write to immutable entry");
            } else {
                entry.value = value.into();
                entry.immutable = immutable;
            }
            return (&*entry, false);
        }

        self.entries.push(Entry::new(key, value, immutable));
        let index = self.entries.len() - 1;
        (&self.entries[index], true)
    }

    /// Insert or update a mutable entry. See [`Store::save`].
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> (&Entry, bool) {
        self.save(key, value, false)
    }

    /// Insert or update an immutable entry.
    ///
    /// Once sealed, only another `set_immutable` can replace the value, and
    /// reads of list, map, byte and shared values return copies the caller
    /// cannot use to reach the stored data.
    pub fn set_immutable(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> (&Entry, bool) {
        self.save(key, value, true)
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    /// The entry stored under `key`.
    pub fn get_entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// The value stored under `key`, respecting immutability.
    pub fn get(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.get_entry(key).map(Entry::value)
    }

    /// The value stored under `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Cow<'_, Value> {
        self.get(key).unwrap_or_else(|| Cow::Owned(default.into()))
    }

    /// Mutable access to a mutable entry's value.
    ///
    /// Returns `None` if the key is absent or the entry is immutable.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|entry| entry.key == key)
            .and_then(Entry::value_mut)
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Call `visitor` with every key and value, in storage order.
    pub fn visit(&self, mut visitor: impl FnMut(&str, &Value)) {
        for entry in &self.entries {
            visitor(&entry.key, &entry.value());
        }
    }

    /// Iterate keys and values in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Cow<'_, Value>)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.value()))
    }

    /// Iterate keys in storage order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// All entries in storage order.
    ///
    /// Entries expose [`Entry::raw`], which hands out the stored value with
    /// no defensive copy even for sealed entries. Prefer [`Store::get`] or
    /// [`Entry::value`] when immutability must hold.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    // ---------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------

    /// Remove the entry for `key`. Returns `true` if an entry was removed.
    ///
    /// Later entries shift down, preserving order.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every entry, keeping the allocated capacity for reuse.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries the store can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

/// Iterates entries in storage order, with the same caveat as
/// [`Store::entries`].
impl<'a> IntoIterator for &'a Store {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
