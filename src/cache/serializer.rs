//! Payload encoding for cached results.
//!
//! The stored text carries no type tag; the caller names the expected [`Shape`].

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    One,
    Many,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    One(T),
    Many(Vec<T>),
}

#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("failed to encode cache payload: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode cache payload: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("cache payload does not have the expected {expected:?} shape")]
    ShapeMismatch { expected: Shape },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn serialize<T: Serialize>(&self, payload: &Payload<T>) -> Result<String, SerializerError> {
        match payload {
            Payload::One(value) => serde_json::to_string(value),
            Payload::Many(values) => serde_json::to_string(values),
        }
        .map_err(SerializerError::Encode)
    }

    pub fn deserialize<T: DeserializeOwned>(
        &self,
        raw: &str,
        shape: Shape,
    ) -> Result<Payload<T>, SerializerError> {
        let value: Value = serde_json::from_str(raw).map_err(SerializerError::Decode)?;
        match (shape, value) {
            (Shape::Many, value @ Value::Array(_)) => serde_json::from_value(value)
                .map(Payload::Many)
                .map_err(SerializerError::Decode),
            (Shape::One, value) if !value.is_array() => serde_json::from_value(value)
                .map(Payload::One)
                .map_err(SerializerError::Decode),
            (expected, _) => Err(SerializerError::ShapeMismatch { expected }),
        }
    }
}
