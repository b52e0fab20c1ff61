use std::fmt;

use serde::{Deserialize, Serialize};

/// The dynamic type of a [`Value`](crate::Value), without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    String,
    Int,
    Int64,
    Float64,
    Bool,
    Time,
    Bytes,
    List,
    Map,
    Shared,
    Opaque,
}

impl ValueKind {
    /// Every built-in kind, in declaration order.
    pub const ALL: [ValueKind; 11] = [
        ValueKind::String,
        ValueKind::Int,
        ValueKind::Int64,
        ValueKind::Float64,
        ValueKind::Bool,
        ValueKind::Time,
        ValueKind::Bytes,
        ValueKind::List,
        ValueKind::Map,
        ValueKind::Shared,
        ValueKind::Opaque,
    ];

    /// Returns `true` for kinds whose payload aliases other storage
    /// (ordered sequences, key associations and indirections).
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Bytes | Self::List | Self::Map | Self::Shared)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Int64 => write!(f, "int64"),
            Self::Float64 => write!(f, "float64"),
            Self::Bool => write!(f, "bool"),
            Self::Time => write!(f, "time"),
            Self::Bytes => write!(f, "bytes"),
            Self::List => write!(f, "list"),
            Self::Map => write!(f, "map"),
            Self::Shared => write!(f, "shared"),
            Self::Opaque => write!(f, "opaque"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kinds_are_distinct() {
        let mut kinds = ValueKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), ValueKind::ALL.len());
    }

    #[test]
    fn containers() {
        assert!(ValueKind::List.is_container());
        assert!(ValueKind::Map.is_container());
        assert!(ValueKind::Shared.is_container());
        assert!(ValueKind::Bytes.is_container());
        assert!(!ValueKind::String.is_container());
        assert!(!ValueKind::Time.is_container());
    }

    #[test]
    fn display_format() {
        assert_eq!(ValueKind::Float64.to_string(), "float64");
        assert_eq!(format!("{}", ValueKind::Map), "map");
    }
}
