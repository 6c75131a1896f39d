//! Conversion between [`Value`] and JSON documents.
//!
//! JSON covers a subset of the value model: objects become mappings with text
//! keys, arrays become lists. Going the other way is lossy: integer keys are
//! rendered as decimal strings, tuples as arrays and tensors as an object
//! with `dtype`, `shape`, `device` and base64 `data` fields.

use base64ct::{Base64, Encoding};
use serde_json::{Map, Number};

use super::{Mapping, Value};
use crate::{Result, codec::CodecError};

impl Value {
    /// Converts a JSON document into a value.
    ///
    /// # Errors
    /// Returns [`CodecError::UnsupportedValueType`] for integers that do not
    /// fit in an `i64`.
    pub fn from_json(json: serde_json::Value) -> Result<Value> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n)?,
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(object) => {
                let mut mapping = Mapping::with_capacity(object.len());
                for (key, value) in object {
                    mapping.insert(key, Value::from_json(value)?);
                }
                Value::Mapping(mapping)
            }
        })
    }

    /// Renders this value as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::Number((*n).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Tensor(t) => serde_json::json!({
                "dtype": t.dtype().name(),
                "shape": t.shape(),
                "device": t.device().as_str(),
                "data": Base64::encode_string(t.as_bytes()),
            }),
            Value::Mapping(mapping) => {
                let mut object = Map::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let name = match key.as_text() {
                        Some(text) => text.to_string(),
                        None => key.to_string(),
                    };
                    object.insert(name, value.to_json());
                }
                serde_json::Value::Object(object)
            }
            Value::List(items) | Value::Tuple(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

fn number_to_value(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    if n.is_u64() {
        return Err(CodecError::UnsupportedValueType {
            kind: "u64".to_string(),
            reason: format!("integer {n} does not fit in a signed 64-bit int"),
        }
        .into());
    }
    n.as_f64().map(Value::Float).ok_or_else(|| {
        CodecError::UnsupportedValueType {
            kind: "number".to_string(),
            reason: format!("{n} is not representable as a float"),
        }
        .into()
    })
}

impl TryFrom<serde_json::Value> for Value {
    type Error = crate::Error;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        Value::from_json(json)
    }
}
