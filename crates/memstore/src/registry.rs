//! The schema table consulted by the snapshot codec.

use std::collections::{BTreeMap, BTreeSet};

use memstore_value::{Opaque, Value, ValueKind, ValueResult};
use serde::de::DeserializeOwned;

use crate::error::{StoreError, StoreResult};

type OpaqueCheck = fn(&Opaque) -> ValueResult<()>;

fn check_payload<T: DeserializeOwned>(opaque: &Opaque) -> ValueResult<()> {
    opaque.decode::<T>().map(|_| ())
}

/// Value kinds and opaque types a [`SnapshotCodec`](crate::SnapshotCodec)
/// accepts.
///
/// Populate it once at startup and share it between the encoding and the
/// decoding side. Opaque types are registered with their Rust type so that
/// decoding can verify each payload actually deserializes.
#[derive(Clone)]
pub struct Registry {
    kinds: BTreeSet<ValueKind>,
    opaque: BTreeMap<String, OpaqueCheck>,
}

impl Registry {
    /// A registry that accepts nothing.
    pub fn empty() -> Self {
        Self {
            kinds: BTreeSet::new(),
            opaque: BTreeMap::new(),
        }
    }

    /// A registry with every built-in value kind, including time.
    ///
    /// No opaque types are registered.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for kind in ValueKind::ALL {
            registry.register_kind(kind);
        }
        registry
    }

    /// Accept values of `kind`.
    pub fn register_kind(&mut self, kind: ValueKind) -> &mut Self {
        self.kinds.insert(kind);
        self
    }

    /// Accept opaque values named `type_name` whose payload decodes as `T`.
    pub fn register_opaque<T: DeserializeOwned>(
        &mut self,
        type_name: impl Into<String>,
    ) -> &mut Self {
        self.kinds.insert(ValueKind::Opaque);
        self.opaque.insert(type_name.into(), check_payload::<T>);
        self
    }

    /// Returns `true` if `kind` is accepted.
    pub fn has_kind(&self, kind: ValueKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Returns `true` if opaque values named `type_name` are accepted.
    pub fn has_opaque(&self, type_name: &str) -> bool {
        self.opaque.contains_key(type_name)
    }

    /// Check that `value` and everything nested in it is registered and no
    /// deeper than `max_depth` levels of lists, maps and shared values.
    pub fn check(&self, value: &Value, max_depth: usize) -> StoreResult<()> {
        self.walk(value, 0, max_depth, false)
    }

    /// Like [`Registry::check`], and also decode every opaque payload with
    /// its registered type.
    pub fn validate(&self, value: &Value, max_depth: usize) -> StoreResult<()> {
        self.walk(value, 0, max_depth, true)
    }

    fn walk(
        &self,
        value: &Value,
        depth: usize,
        max_depth: usize,
        decode_opaque: bool,
    ) -> StoreResult<()> {
        if depth > max_depth {
            return Err(StoreError::NestingTooDeep { max: max_depth });
        }
        let kind = value.kind();
        if !self.has_kind(kind) {
            return Err(StoreError::UnregisteredKind(kind));
        }
        let next = depth + 1;
        match value {
            Value::List(items) => items
                .iter()
                .try_for_each(|v| self.walk(v, next, max_depth, decode_opaque)),
            Value::Map(map) => map
                .values()
                .try_for_each(|v| self.walk(v, next, max_depth, decode_opaque)),
            Value::Shared(shared) => self.walk(&shared.borrow(), next, max_depth, decode_opaque),
            Value::Opaque(opaque) => {
                let check = self
                    .opaque
                    .get(&opaque.type_name)
                    .ok_or_else(|| StoreError::UnregisteredOpaque(opaque.type_name.clone()))?;
                if decode_opaque {
                    check(opaque)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds)
            .field("opaque", &self.opaque.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
