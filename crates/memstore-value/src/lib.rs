//! Value payloads for memstore.
//!
//! Every entry in a memstore `Store` holds one [`Value`].
//! The variant carries the dynamic type, so typed accessors and the
//! snapshot codec work by pattern matching instead of runtime reflection.
//!
//! # Key Types
//!
//! - [`Value`] — Heterogeneous payload (scalars, lists, maps, time, bytes)
//! - [`ValueKind`] — Field-less discriminant of a `Value`
//! - [`SharedValue`] — Aliasable indirection the caller can keep and mutate
//! - [`Opaque`] — User type carried as a named bincode payload

pub mod error;
pub mod kind;
pub mod opaque;
pub mod shared;
pub mod value;

pub use error::{ValueError, ValueResult};
pub use kind::ValueKind;
pub use opaque::Opaque;
pub use shared::SharedValue;
pub use value::Value;
