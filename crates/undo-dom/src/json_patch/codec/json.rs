//! JSON codec for patch operations.
//!
//! Converts operations to and from `serde_json::Value` in the wire format:
//! `{"op": "add" | "replace" | "remove", "path": "<pointer>", "value": <any>}`,
//! where `value` is present exactly when `op` is not `remove`.

use serde_json::{json, Value};
use undo_dom_pointer::validate_json_pointer;

use crate::json_patch::types::{Op, PatchError, PatchKind};

fn decode_path(v: Option<&Value>) -> Result<String, PatchError> {
    let path = v
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOp("path must be a string".into()))?;
    validate_json_pointer(path).map_err(|e| PatchError::invalid_path(path, e))?;
    Ok(path.to_string())
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an `Op` to its wire object.
pub fn to_json(op: &Op) -> Value {
    match op {
        Op::Add { path, value } => json!({
            "op": "add",
            "path": path,
            "value": value
        }),
        Op::Replace { path, value } => json!({
            "op": "replace",
            "path": path,
            "value": value
        }),
        Op::Remove { path } => json!({
            "op": "remove",
            "path": path
        }),
    }
}

/// Serialize a list of operations to a wire patch set.
pub fn to_json_patch(ops: &[Op]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one wire object into an `Op`.
pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("operation must be an object".into()))?;
    let name = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOp("missing op".into()))?;
    let kind = PatchKind::from_str(name)?;
    let path = decode_path(obj.get("path"))?;
    let value = obj.get("value");

    match (kind, value) {
        (PatchKind::Add, Some(value)) => Ok(Op::Add {
            path,
            value: value.clone(),
        }),
        (PatchKind::Replace, Some(value)) => Ok(Op::Replace {
            path,
            value: value.clone(),
        }),
        (PatchKind::Remove, None) => Ok(Op::Remove { path }),
        (PatchKind::Remove, Some(_)) => Err(PatchError::InvalidOp(
            "remove must not carry a value".into(),
        )),
        (kind, None) => Err(PatchError::InvalidOp(format!(
            "{} requires a value",
            kind.as_str()
        ))),
    }
}

/// Deserialize a wire patch set.
pub fn from_json_patch(v: &Value) -> Result<Vec<Op>, PatchError> {
    let arr = v.as_array().ok_or_else(|| {
        PatchError::PreconditionViolation("patch set must be an array".into())
    })?;
    arr.iter().map(from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_wire_shape() {
        let op = Op::Add {
            path: "/Entities/E1".into(),
            value: json!({"Name": "Wheel"}),
        };
        assert_eq!(
            to_json(&op),
            json!({"op": "add", "path": "/Entities/E1", "value": {"Name": "Wheel"}})
        );
    }

    #[test]
    fn remove_wire_shape_has_no_value() {
        let v = to_json(&Op::Remove { path: "/a/b".into() });
        assert_eq!(v, json!({"op": "remove", "path": "/a/b"}));
        assert!(v.get("value").is_none());
    }

    #[test]
    fn wire_field_order() {
        let v = to_json(&Op::Replace {
            path: "/x".into(),
            value: json!(2),
        });
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["op", "path", "value"]);
    }

    #[test]
    fn decode_patch_set() {
        let ops = from_json_patch(&json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "replace", "path": "/a", "value": null},
            {"op": "remove", "path": "/a"}
        ]))
        .unwrap();
        assert_eq!(
            ops,
            vec![
                Op::Add { path: "/a".into(), value: json!(1) },
                Op::Replace { path: "/a".into(), value: json!(null) },
                Op::Remove { path: "/a".into() },
            ]
        );
    }

    #[test]
    fn decode_rejects_malformed_operations() {
        assert!(matches!(
            from_json(&json!({"op": "move", "path": "/a", "from": "/b"})),
            Err(PatchError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            from_json(&json!({"op": "add", "path": "/a"})),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(
            from_json(&json!({"op": "remove", "path": "/a", "value": 1})),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(
            from_json(&json!({"op": "add", "path": 3, "value": 1})),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(
            from_json(&json!({"op": "add", "path": "a", "value": 1})),
            Err(PatchError::InvalidPath { .. })
        ));
        assert!(matches!(
            from_json(&json!(["add"])),
            Err(PatchError::InvalidOp(_))
        ));
    }

    #[test]
    fn decode_rejects_non_array_patch_set() {
        assert!(matches!(
            from_json_patch(&json!({"op": "remove", "path": "/a"})),
            Err(PatchError::PreconditionViolation(_))
        ));
    }
}
