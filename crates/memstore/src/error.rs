use memstore_value::{ValueError, ValueKind};

/// Errors from store operations.
///
/// Absent keys, type mismatches on typed accessors and rejected overwrites
/// of immutable entries are not errors; they resolve to defaults or to a
/// `false` insertion flag.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A stored string could not be parsed into the requested type.
    #[error("unable to parse {key:?} as {kind}, found: {raw:?}")]
    Parse {
        key: String,
        kind: ValueKind,
        raw: String,
    },

    /// A value kind is not registered with the snapshot codec.
    #[error("value kind {0} is not registered")]
    UnregisteredKind(ValueKind),

    /// An opaque payload type is not registered with the snapshot codec.
    #[error("opaque type {0:?} is not registered")]
    UnregisteredOpaque(String),

    /// A value nests lists, maps or shared values deeper than allowed.
    #[error("value nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize },

    /// Snapshot exceeds the configured size limit.
    #[error("snapshot too large: {size} bytes (max {max})")]
    SnapshotTooLarge { size: usize, max: usize },

    /// Snapshot framing is malformed.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failure.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A registered opaque payload failed validation.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// I/O error from the snapshot sink or source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
