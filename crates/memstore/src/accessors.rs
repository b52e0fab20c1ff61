//! Typed accessors over [`Store::get`].
//!
//! Every accessor resolves in the same order:
//!
//! 1. absent key: the supplied default;
//! 2. stored value already of the target type: that value;
//! 3. stored string: parsed into the target type, with parse failures
//!    reported as [`StoreError::Parse`];
//! 4. anything else: the supplied default, silently.
//!
//! Numeric accessors treat an empty string as absent. The boolean accessor
//! also maps a stored `Int(1)` to `true` and any other `Int` to `false`.

use std::str::FromStr;

use memstore_value::{Value, ValueKind};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

fn parse_error(key: &str, kind: ValueKind, raw: &str) -> StoreError {
    StoreError::Parse {
        key: key.to_string(),
        kind,
        raw: raw.to_string(),
    }
}

fn parse_number<T: FromStr>(key: &str, kind: ValueKind, raw: &str, default: T) -> StoreResult<T> {
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse().map_err(|_| parse_error(key, kind, raw))
}

/// Parse the canonical boolean tokens.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl Store {
    /// The string stored under `key`, or `default` if absent or not a string.
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        match self.get(key).as_deref() {
            Some(Value::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    /// The string stored under `key`, or an empty string.
    pub fn get_string(&self, key: &str) -> String {
        self.get_string_or(key, "")
    }

    /// The string stored under `key` with surrounding whitespace removed.
    pub fn get_string_trim(&self, key: &str) -> String {
        self.get_string(key).trim().to_string()
    }

    /// The `Int` stored under `key`, parsing strings.
    pub fn get_int_or(&self, key: &str, default: i32) -> StoreResult<i32> {
        match self.get(key).as_deref() {
            Some(Value::Int(n)) => Ok(*n),
            Some(Value::String(s)) => parse_number(key, ValueKind::Int, s, default),
            _ => Ok(default),
        }
    }

    /// Same as [`Store::get_int_or`] with a default of `0`.
    pub fn get_int(&self, key: &str) -> StoreResult<i32> {
        self.get_int_or(key, 0)
    }

    /// The `Int64` stored under `key`, parsing strings.
    pub fn get_int64_or(&self, key: &str, default: i64) -> StoreResult<i64> {
        match self.get(key).as_deref() {
            Some(Value::Int64(n)) => Ok(*n),
            Some(Value::String(s)) => parse_number(key, ValueKind::Int64, s, default),
            _ => Ok(default),
        }
    }

    /// Same as [`Store::get_int64_or`] with a default of `0`.
    pub fn get_int64(&self, key: &str) -> StoreResult<i64> {
        self.get_int64_or(key, 0)
    }

    /// The `Float64` stored under `key`, parsing strings.
    pub fn get_float64_or(&self, key: &str, default: f64) -> StoreResult<f64> {
        match self.get(key).as_deref() {
            Some(Value::Float64(n)) => Ok(*n),
            Some(Value::String(s)) => parse_number(key, ValueKind::Float64, s, default),
            _ => Ok(default),
        }
    }

    /// Same as [`Store::get_float64_or`] with a default of `0.0`.
    pub fn get_float64(&self, key: &str) -> StoreResult<f64> {
        self.get_float64_or(key, 0.0)
    }

    /// The `Bool` stored under `key`.
    ///
    /// Strings must be one of `1 t T TRUE true True` or
    /// `0 f F FALSE false False`; anything else, including the empty
    /// string, is a parse error.
    pub fn get_bool_or(&self, key: &str, default: bool) -> StoreResult<bool> {
        match self.get(key).as_deref() {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => {
                parse_bool(s).ok_or_else(|| parse_error(key, ValueKind::Bool, s))
            }
            Some(Value::Int(n)) => Ok(*n == 1),
            _ => Ok(default),
        }
    }

    /// Same as [`Store::get_bool_or`] with a default of `false`.
    pub fn get_bool(&self, key: &str) -> StoreResult<bool> {
        self.get_bool_or(key, false)
    }
}
