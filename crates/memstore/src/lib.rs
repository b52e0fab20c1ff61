//! Ordered, request-scoped key-value storage.
//!
//! A [`Store`] carries values through a request or session call chain.
//! Entries keep insertion order, writes are upserts, and any entry can be
//! sealed as immutable so later code in the chain cannot replace it or
//! mutate what it holds.
//!
//! # Writes
//!
//! All writes go through [`Store::save`]:
//!
//! - [`Store::set`] — mutable write; ignored if the entry is immutable
//! - [`Store::set_immutable`] — sealing write; may replace a sealed value
//!
//! # Reads
//!
//! [`Store::get`] returns the stored value for mutable entries and a
//! detached copy for immutable ones. Typed accessors
//! (`get_string`, `get_int`, `get_int64`, `get_float64`, `get_bool` and
//! their `_or` variants) build on it and parse stored strings.
//!
//! # Snapshots
//!
//! [`SnapshotCodec`] writes a self-describing binary snapshot of the full
//! entry list, checked against a [`Registry`] of accepted value kinds and
//! opaque types.
//!
//! # Design Rules
//!
//! 1. Keys are unique; order is first-insertion order.
//! 2. A plain write never unseals an immutable entry.
//! 3. Absent keys and type mismatches resolve to defaults, not errors.
//! 4. A store has one owner and does no locking.

pub mod accessors;
pub mod codec;
pub mod config;
pub mod entry;
pub mod error;
pub mod registry;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::{SnapshotCodec, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use config::{CodecConfig, StoreConfig};
pub use entry::Entry;
pub use error::{StoreError, StoreResult};
pub use memstore_value::{Opaque, SharedValue, Value, ValueKind};
pub use registry::Registry;
pub use store::Store;
