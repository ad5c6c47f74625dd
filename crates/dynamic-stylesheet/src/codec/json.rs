//! JSON codec for diff batches.
//!
//! Each edit is an object `{ "type": "node" | "properties" | "raw", "path":
//! [..], "value": .. }`. A node deletion carries `"value": null`, and so does
//! a property removal inside a properties map.

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::stylesheet_diff::{Diff, Edit, Path, PropertyChanges};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("INVALID_EDIT: {0}")]
    InvalidEdit(String),
    #[error("UNKNOWN_EDIT_TYPE: {0}")]
    UnknownType(String),
}

fn invalid(msg: impl Into<String>) -> CodecError {
    CodecError::InvalidEdit(msg.into())
}

// ── Serialization ─────────────────────────────────────────────────────────

fn encode_changes(changes: &PropertyChanges) -> Value {
    let map: Map<String, Value> = changes
        .iter()
        .map(|(k, v)| (k.clone(), v.as_ref().map_or(Value::Null, |s| json!(s))))
        .collect();
    Value::Object(map)
}

pub fn to_json(edit: &Edit) -> Value {
    match edit {
        Edit::Node { path, value } => json!({
            "type": "node",
            "path": path,
            "value": value
        }),
        Edit::Properties { path, value } => json!({
            "type": "properties",
            "path": path,
            "value": encode_changes(value)
        }),
        Edit::Raw { path, value } => json!({
            "type": "raw",
            "path": path,
            "value": value
        }),
    }
}

pub fn to_json_diff(diff: &[Edit]) -> Value {
    Value::Array(diff.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

fn decode_path(v: Option<&Value>) -> Result<Path, CodecError> {
    let arr = v
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("path must be an array"))?;
    arr.iter()
        .map(|step| {
            step.as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid(format!("path step {step} is not an index")))
        })
        .collect()
}

fn decode_text(v: Option<&Value>, kind: &str) -> Result<String, CodecError> {
    v.and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("{kind} requires a string 'value'")))
}

fn decode_changes(v: Option<&Value>) -> Result<PropertyChanges, CodecError> {
    let obj = v
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("properties requires an object 'value'"))?;
    obj.iter()
        .map(|(k, v)| match v {
            Value::Null => Ok((k.clone(), None)),
            Value::String(s) => Ok((k.clone(), Some(s.clone()))),
            other => Err(invalid(format!("property '{k}' cannot be {other}"))),
        })
        .collect()
}

pub fn from_json(v: &Value) -> Result<Edit, CodecError> {
    let obj = v
        .as_object()
        .ok_or_else(|| invalid("edit must be an object"))?;
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing 'type' field"))?;
    let path = decode_path(obj.get("path"))?;
    let value = obj.get("value");
    match kind {
        "node" => {
            let value = match value {
                None | Some(Value::Null) => None,
                other => Some(decode_text(other, "node")?),
            };
            Ok(Edit::Node { path, value })
        }
        "properties" => Ok(Edit::Properties {
            path,
            value: decode_changes(value)?,
        }),
        "raw" => Ok(Edit::Raw {
            path,
            value: decode_text(value, "raw")?,
        }),
        other => Err(CodecError::UnknownType(other.to_string())),
    }
}

pub fn from_json_diff(v: &Value) -> Result<Diff, CodecError> {
    let arr = v
        .as_array()
        .ok_or_else(|| invalid("diff must be an array"))?;
    arr.iter().map(from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_encodes_null_value() {
        let edit = Edit::Node {
            path: vec![1],
            value: None,
        };
        assert_eq!(to_json(&edit), json!({"type": "node", "path": [1], "value": null}));
    }

    #[test]
    fn properties_keep_key_order_and_nulls() {
        let mut value = PropertyChanges::new();
        value.insert("background".into(), Some("blue".into()));
        value.insert("z-index".into(), None);
        let edit = Edit::Properties {
            path: vec![0, 2],
            value,
        };
        let encoded = to_json(&edit);
        assert_eq!(
            serde_json::to_string(&encoded).unwrap(),
            r#"{"type":"properties","path":[0,2],"value":{"background":"blue","z-index":null}}"#
        );
        assert_eq!(from_json(&encoded).unwrap(), edit);
    }

    #[test]
    fn node_without_value_field_is_a_delete() {
        let edit = from_json(&json!({"type": "node", "path": [3]})).unwrap();
        assert!(edit.is_delete());
    }

    #[test]
    fn decodes_batch() {
        let diff = from_json_diff(&json!([
            {"type": "node", "path": [1], "value": null},
            {"type": "raw", "path": [1], "value": "a {}"}
        ]))
        .unwrap();
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[1].type_name(), "raw");
    }

    #[test]
    fn rejects_malformed_edits() {
        assert_eq!(
            from_json(&json!({"type": "move", "path": [0]})),
            Err(CodecError::UnknownType("move".into()))
        );
        assert!(from_json(&json!({"type": "raw", "path": [0]})).is_err());
        assert!(from_json(&json!({"type": "raw", "path": [-1], "value": "a {}"})).is_err());
        assert!(from_json(&json!({"type": "properties", "path": [0], "value": {"a": 1}})).is_err());
        assert!(from_json_diff(&json!({})).is_err());
    }
}
