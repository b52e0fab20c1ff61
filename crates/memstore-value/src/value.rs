use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::ValueKind;
use crate::opaque::Opaque;
use crate::shared::SharedValue;

/// A dynamically-typed payload stored under a key.
///
/// `Int` and `Int64` are distinct kinds: a typed accessor for one does not
/// match a value stored as the other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Int(i32),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    /// UTC timestamp.
    Time(DateTime<Utc>),
    /// Raw byte sequence.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Key associations, iterated in key order.
    Map(BTreeMap<String, Value>),
    /// Indirection shared with whoever else holds the handle.
    Shared(SharedValue),
    /// Registered user type.
    Opaque(Opaque),
}

impl Value {
    /// Construct a `Bytes` value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Construct a `Shared` value behind a fresh handle.
    pub fn shared(value: impl Into<Value>) -> Self {
        Self::Shared(SharedValue::new(value))
    }

    /// The dynamic type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float64(_) => ValueKind::Float64,
            Self::Bool(_) => ValueKind::Bool,
            Self::Time(_) => ValueKind::Time,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Shared(_) => ValueKind::Shared,
            Self::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// A view of this value that cannot reach back into its storage.
    ///
    /// An indirection is replaced by a by-value copy of its referent.
    /// Sequences and key associations are copied into fresh allocations.
    /// Everything else is returned borrowed.
    pub fn detach(&self) -> Cow<'_, Value> {
        match self {
            Self::Shared(shared) => Cow::Owned(shared.get()),
            Self::Bytes(data) => Cow::Owned(Self::Bytes(data.to_vec())),
            Self::List(items) => Cow::Owned(Self::List(items.iter().cloned().collect())),
            Self::Map(map) => Cow::Owned(Self::Map(
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            )),
            other => Cow::Borrowed(other),
        }
    }

    /// The string payload, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The list payload, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The map payload, if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int64(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float64(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Time(t)
    }
}

impl From<SharedValue> for Value {
    fn from(shared: SharedValue) -> Self {
        Self::Shared(shared)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Self::Opaque(opaque)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn sample_map() -> Value {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1i64);
        map.insert("b".to_string(), 2i64);
        Value::from(map)
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::from(1i32).kind(), ValueKind::Int);
        assert_eq!(Value::from(1i64).kind(), ValueKind::Int64);
        assert_eq!(Value::from(1.5).kind(), ValueKind::Float64);
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::bytes(b"ab".to_vec()).kind(), ValueKind::Bytes);
        assert_eq!(Value::from(vec!["a", "b"]).kind(), ValueKind::List);
        assert_eq!(sample_map().kind(), ValueKind::Map);
        assert_eq!(Value::shared(1i32).kind(), ValueKind::Shared);
    }

    #[test]
    fn detach_copies_list() {
        let original = Value::from(vec![1i64, 2, 3]);
        let detached = original.detach();
        assert!(matches!(detached, Cow::Owned(_)));
        let mut copy = detached.into_owned();
        if let Value::List(items) = &mut copy {
            items[0] = Value::Int64(99);
        }
        assert_eq!(original, Value::from(vec![1i64, 2, 3]));
    }

    #[test]
    fn detach_copies_map() {
        let original = sample_map();
        let mut copy = original.detach().into_owned();
        if let Value::Map(map) = &mut copy {
            map.insert("c".to_string(), Value::Int64(3));
        }
        assert_eq!(original.as_map().unwrap().len(), 2);
        assert_eq!(copy.as_map().unwrap().len(), 3);
    }

    #[test]
    fn detach_dereferences_shared() {
        let handle = SharedValue::new("inner");
        let value = Value::Shared(handle.clone());
        let detached = value.detach().into_owned();
        assert_eq!(detached, Value::from("inner"));

        handle.set("changed");
        assert_eq!(detached, Value::from("inner"));
    }

    #[test]
    fn detach_borrows_scalars() {
        let value = Value::from(42i32);
        assert!(matches!(value.detach(), Cow::Borrowed(_)));
    }

    #[test]
    fn hash_map_converts_to_ordered_map() {
        let mut map = HashMap::new();
        map.insert("z".to_string(), true);
        map.insert("a".to_string(), false);
        let value = Value::from(map);
        let keys: Vec<&String> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "z"]);
    }

    #[test]
    fn serde_roundtrip() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let value = Value::from(vec![
            Value::from("s"),
            Value::from(7i32),
            Value::from(time),
            sample_map(),
            Value::shared(false),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, parsed);
    }

    proptest! {
        #[test]
        fn detached_list_equals_original(items in proptest::collection::vec(any::<i64>(), 0..32)) {
            let value = Value::from(items);
            prop_assert_eq!(value.detach().into_owned(), value.clone());
        }

        #[test]
        fn detached_map_equals_original(
            map in proptest::collection::btree_map("[a-z]{1,8}", ".*", 0..16)
        ) {
            let value = Value::from(map);
            prop_assert_eq!(value.detach().into_owned(), value);
        }
    }
}
