use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};

/// A user-defined type carried as a named bincode payload.
///
/// The name is the registration key a snapshot codec checks before it will
/// encode or decode the payload; the bytes are never interpreted by the
/// store itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Opaque {
    /// Registered name of the payload type.
    pub type_name: String,
    /// bincode encoding of the payload.
    pub payload: Vec<u8>,
}

impl Opaque {
    /// Encode `value` under `type_name`.
    pub fn encode<T: Serialize>(type_name: impl Into<String>, value: &T) -> ValueResult<Self> {
        let type_name = type_name.into();
        let payload = bincode::serialize(value).map_err(|e| ValueError::OpaqueEncode {
            type_name: type_name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { type_name, payload })
    }

    /// Decode the payload as `T` without checking the type name.
    pub fn decode<T: DeserializeOwned>(&self) -> ValueResult<T> {
        bincode::deserialize(&self.payload).map_err(|e| ValueError::OpaqueDecode {
            type_name: self.type_name.clone(),
            reason: e.to_string(),
        })
    }

    /// Decode the payload as `T`, requiring it was encoded under `type_name`.
    pub fn decode_as<T: DeserializeOwned>(&self, type_name: &str) -> ValueResult<T> {
        if self.type_name != type_name {
            return Err(ValueError::OpaqueTypeMismatch {
                expected: type_name.to_string(),
                found: self.type_name.clone(),
            });
        }
        self.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        user: String,
        hits: u32,
    }

    fn session() -> Session {
        Session {
            user: "ada".into(),
            hits: 3,
        }
    }

    #[test]
    fn encode_then_decode_as() {
        let opaque = Opaque::encode("session", &session()).unwrap();
        assert_eq!(opaque.type_name, "session");
        let decoded: Session = opaque.decode_as("session").unwrap();
        assert_eq!(decoded, session());
    }

    #[test]
    fn decode_as_wrong_name() {
        let opaque = Opaque::encode("session", &session()).unwrap();
        let err = opaque.decode_as::<Session>("cart").unwrap_err();
        assert_eq!(
            err,
            ValueError::OpaqueTypeMismatch {
                expected: "cart".into(),
                found: "session".into(),
            }
        );
    }

    #[test]
    fn decode_truncated_payload() {
        let mut opaque = Opaque::encode("session", &session()).unwrap();
        opaque.payload.truncate(2);
        let err = opaque.decode::<Session>().unwrap_err();
        assert!(matches!(err, ValueError::OpaqueDecode { .. }));
    }
}
