use thiserror::Error;

/// Errors produced by value operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("opaque type mismatch: expected {expected}, found {found}")]
    OpaqueTypeMismatch { expected: String, found: String },

    #[error("opaque payload for {type_name} could not be encoded: {reason}")]
    OpaqueEncode { type_name: String, reason: String },

    #[error("opaque payload for {type_name} could not be decoded: {reason}")]
    OpaqueDecode { type_name: String, reason: String },
}

/// Result alias for value operations.
pub type ValueResult<T> = Result<T, ValueError>;
