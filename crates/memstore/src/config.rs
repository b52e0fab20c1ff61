use serde::{Deserialize, Serialize};

/// Configuration for a [`Store`](crate::Store).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Entry slots reserved up front. Request scopes rarely hold more than
    /// a handful of values.
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 8,
        }
    }
}

/// Configuration for a [`SnapshotCodec`](crate::SnapshotCodec).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest snapshot payload accepted on encode or decode, in bytes.
    pub max_snapshot_size: usize,
    /// Deepest nesting of lists, maps and shared values accepted on encode
    /// or decode. An entry's own value is at depth 0.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_snapshot_size: 16 * 1024 * 1024,
            max_depth: 64,
        }
    }
}
