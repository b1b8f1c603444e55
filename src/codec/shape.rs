//! Structural handling of the JSON root.
//!
//! Decoding never relies on implicit single-to-array coercion. The root is
//! matched explicitly:
//! ```text
//!   {..}      → Object   (one message, or a one-element batch)
//!   [{..},..] → Array    (batch)
//!   null      → rejected (never an empty batch)
//!   scalar    → rejected
//! ```
//! Each object is then tag-discriminated into a [`Message`].

use serde_json::{Map, Value};

use crate::messages::Message;
use crate::types::{Error, Result};

/// Root shape of a wire payload.
#[derive(Debug)]
pub(crate) enum WireShape {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl WireShape {
    pub(crate) fn parse(input: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(input)?;
        match root {
            Value::Object(map) => Ok(WireShape::Object(map)),
            Value::Array(items) => Ok(WireShape::Array(items)),
            Value::Null => Err(Error::protocol("null payload")),
            other => Err(Error::protocol(format!(
                "expected a JSON object or array, got {}",
                kind(&other)
            ))),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            WireShape::Object(_) => "object",
            WireShape::Array(_) => "array",
        }
    }

    /// Array-compatibility view: a lone object is a one-element sequence.
    pub(crate) fn into_sequence(self) -> Result<Vec<Message>> {
        match self {
            WireShape::Object(map) => Ok(vec![to_message(Value::Object(map))?]),
            WireShape::Array(items) => items.into_iter().map(to_message).collect(),
        }
    }

    /// Exactly one top-level object.
    pub(crate) fn into_single(self) -> Result<Message> {
        match self {
            WireShape::Object(map) => to_message(Value::Object(map)),
            WireShape::Array(items) => Err(Error::protocol(format!(
                "expected a single message object, got an array of {}",
                items.len()
            ))),
        }
    }
}

fn to_message(value: Value) -> Result<Message> {
    Ok(serde_json::from_value(value)?)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Rebuild every object with keys in lexicographic order.
///
/// Holds regardless of whether `serde_json` maps preserve insertion order.
pub(crate) fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lone_object_becomes_one_element_sequence() {
        let shape = WireShape::parse(br#"{"_type":"lwt","tst":5}"#).unwrap();
        assert_eq!(shape.kind(), "object");
        assert_eq!(shape.into_sequence().unwrap().len(), 1);
    }

    #[test]
    fn null_root_is_a_protocol_error() {
        let err = WireShape::parse(b"null").unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn scalar_root_is_a_protocol_error() {
        let err = WireShape::parse(b"42").unwrap_err();
        assert!(err.is_protocol());
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn truncated_json_is_a_parse_error() {
        let err = WireShape::parse(br#"[{"_type":"lwt","#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn null_element_is_a_parse_error() {
        let shape = WireShape::parse(b"[null]").unwrap();
        assert!(shape.into_sequence().unwrap_err().is_parse());
    }

    #[test]
    fn single_rejects_arrays() {
        let shape = WireShape::parse(br#"[{"_type":"clear"}]"#).unwrap();
        assert!(shape.into_single().unwrap_err().is_protocol());
    }

    #[test]
    fn sort_keys_is_recursive() {
        let sorted = sort_keys(json!({"b": 1, "a": {"z": 0, "y": [{"d": 1, "c": 2}]}}));
        assert_eq!(
            serde_json::to_string(&sorted).unwrap(),
            r#"{"a":{"y":[{"c":2,"d":1}],"z":0},"b":1}"#
        );
    }
}
