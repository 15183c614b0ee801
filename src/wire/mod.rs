//! Wire Codec
//!
//! Maps the entity model to and from plain JSON values. Encoding never fails.
//! Decoding checks every field's presence and type and stops at the first
//! problem, naming the entity, the field, and what was expected; nothing is
//! constructed from partially valid input.
//!
//! The same encoding is used on the socket and in the save file.

mod entities;
mod celestial;
mod game;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::game::Capacity;

/// Wire token for an unbounded capacity. JSON has no infinity.
pub const UNBOUNDED_TOKEN: &str = "Infinity";

/// A type with a canonical JSON form.
pub trait Wire: Sized {
    /// Encode to a JSON value.
    fn encode(&self) -> Value;

    /// Decode and validate a JSON value.
    fn decode(value: &Value) -> Result<Self, DecodeError>;
}

/// Malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Value is not a JSON object.
    #[error("malformed input: {context} must be an object")]
    NotAnObject {
        /// Entity being decoded
        context: &'static str,
    },

    /// Required field absent.
    #[error("malformed input: {context} must have '{field}' property")]
    MissingField {
        /// Entity being decoded
        context: &'static str,
        /// Field name
        field: &'static str,
    },

    /// Field present but of the wrong shape.
    #[error("malformed input: {context} '{field}' must be {expected}")]
    WrongType {
        /// Entity being decoded
        context: &'static str,
        /// Field name
        field: &'static str,
        /// Expected shape
        expected: &'static str,
    },

    /// Fields are individually valid but violate an invariant together.
    #[error("malformed input: {context} '{field}' {reason}")]
    Inconsistent {
        /// Entity being decoded
        context: &'static str,
        /// Field name
        field: &'static str,
        /// What was violated
        reason: String,
    },
}

// =============================================================================
// FIELD READER
// =============================================================================

/// Typed access to the fields of one JSON object.
pub(crate) struct Fields<'a> {
    context: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Require `value` to be an object.
    pub(crate) fn of(value: &'a Value, context: &'static str) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self { context, map }),
            _ => Err(DecodeError::NotAnObject { context }),
        }
    }

    /// Whether `field` is present, whatever its value.
    pub(crate) fn has(&self, field: &str) -> bool {
        self.map.contains_key(field)
    }

    /// Raw value of a required field.
    pub(crate) fn get(&self, field: &'static str) -> Result<&'a Value, DecodeError> {
        self.map.get(field).ok_or(DecodeError::MissingField {
            context: self.context,
            field,
        })
    }

    pub(crate) fn wrong(&self, field: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::WrongType {
            context: self.context,
            field,
            expected,
        }
    }

    pub(crate) fn inconsistent(
        &self,
        field: &'static str,
        reason: impl Into<String>,
    ) -> DecodeError {
        DecodeError::Inconsistent {
            context: self.context,
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn string(&self, field: &'static str) -> Result<String, DecodeError> {
        self.get(field)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.wrong(field, "a string"))
    }

    pub(crate) fn boolean(&self, field: &'static str) -> Result<bool, DecodeError> {
        self.get(field)?
            .as_bool()
            .ok_or_else(|| self.wrong(field, "a boolean"))
    }

    pub(crate) fn number(&self, field: &'static str) -> Result<f64, DecodeError> {
        self.get(field)?
            .as_f64()
            .ok_or_else(|| self.wrong(field, "a number"))
    }

    pub(crate) fn int(&self, field: &'static str) -> Result<i32, DecodeError> {
        self.get(field)?
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.wrong(field, "an integer"))
    }

    pub(crate) fn count(&self, field: &'static str) -> Result<u32, DecodeError> {
        self.get(field)?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.wrong(field, "a non-negative integer"))
    }

    pub(crate) fn health(&self, field: &'static str, max: u8) -> Result<u8, DecodeError> {
        let health = self
            .get(field)?
            .as_u64()
            .ok_or_else(|| self.wrong(field, "a non-negative integer"))?;
        u8::try_from(health)
            .ok()
            .filter(|n| *n <= max)
            .ok_or_else(|| self.inconsistent(field, format!("must be at most {}", max)))
    }

    pub(crate) fn capacity(&self, field: &'static str) -> Result<Capacity, DecodeError> {
        decode_capacity(self.get(field)?)
            .ok_or_else(|| self.wrong(field, "a non-negative integer or 'Infinity'"))
    }

    pub(crate) fn array(&self, field: &'static str) -> Result<&'a Vec<Value>, DecodeError> {
        self.get(field)?
            .as_array()
            .ok_or_else(|| self.wrong(field, "an array"))
    }

    pub(crate) fn strings(&self, field: &'static str) -> Result<Vec<String>, DecodeError> {
        self.array(field)?
            .iter()
            .map(|v| v.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.wrong(field, "an array of strings"))
    }

    /// Decode a nested entity.
    pub(crate) fn nested<T: Wire>(&self, field: &'static str) -> Result<T, DecodeError> {
        T::decode(self.get(field)?)
    }

    /// Decode a nested entity that may be `null`. The field itself is required.
    pub(crate) fn nullable<T: Wire>(&self, field: &'static str) -> Result<Option<T>, DecodeError> {
        match self.get(field)? {
            Value::Null => Ok(None),
            value => T::decode(value).map(Some),
        }
    }
}

/// Encode an optional entity as its value or `null`.
pub(crate) fn encode_nullable<T: Wire>(item: Option<&T>) -> Value {
    item.map_or(Value::Null, Wire::encode)
}

/// Encode a list of entities.
pub(crate) fn encode_all<T: Wire>(items: &[T]) -> Value {
    Value::Array(items.iter().map(Wire::encode).collect())
}

/// Decode each element of a JSON array.
pub(crate) fn decode_all<T: Wire>(values: &[Value]) -> Result<Vec<T>, DecodeError> {
    values.iter().map(T::decode).collect()
}

/// Encode a capacity, using the sentinel token when unbounded.
pub(crate) fn encode_capacity(capacity: Capacity) -> Value {
    match capacity {
        Capacity::Finite(limit) => Value::from(limit),
        Capacity::Unbounded => Value::from(UNBOUNDED_TOKEN),
    }
}

fn decode_capacity(value: &Value) -> Option<Capacity> {
    match value {
        Value::String(token) if token == UNBOUNDED_TOKEN => Some(Capacity::Unbounded),
        value => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Capacity::Finite),
    }
}
