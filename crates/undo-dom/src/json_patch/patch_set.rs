//! Patch sets stored as documents.
//!
//! A patch set is a [`Document`] whose root is an array of operation
//! objects in the wire layout. Keeping it as a document lets the builder
//! deep-clone captured values straight into the patch set's own arena.

use indexmap::IndexMap;
use serde_json::Value;

use super::codec::json::{from_json_patch, to_json_patch};
use super::types::{Op, PatchError, PatchKind};
use crate::dom::{Document, Node, NodeId, ValueRef};

/// One operation read in place from a patch set document.
#[derive(Debug, Clone, Copy)]
pub struct PatchEntry<'a> {
    pub kind: PatchKind,
    pub path: &'a str,
    pub value: Option<ValueRef<'a>>,
}

impl PatchEntry<'_> {
    /// Detach this entry from its document.
    pub fn to_op(&self) -> Op {
        let path = self.path.to_string();
        let value = self.value.map(|v| v.to_json()).unwrap_or(Value::Null);
        match self.kind {
            PatchKind::Add => Op::Add { path, value },
            PatchKind::Replace => Op::Replace { path, value },
            PatchKind::Remove => Op::Remove { path },
        }
    }
}

pub(crate) fn ensure_array(patches: &Document, caller: &str) -> Result<(), PatchError> {
    if patches.is_array() {
        return Ok(());
    }
    let kind = patches
        .root_ref()
        .kind()
        .map(|k| k.as_str())
        .unwrap_or("invalid");
    Err(PatchError::PreconditionViolation(format!(
        "{caller}: patches must be an array, got {kind}"
    )))
}

/// Read every operation of a patch set without copying values.
pub fn patch_entries(patches: &Document) -> Result<Vec<PatchEntry<'_>>, PatchError> {
    ensure_array(patches, "patch_entries")?;
    let items = patches.root_ref().as_array().unwrap_or_default();
    items.iter().map(|&id| read_entry(patches.value(id))).collect()
}

fn read_entry(entry: ValueRef<'_>) -> Result<PatchEntry<'_>, PatchError> {
    if entry.as_object().is_none() {
        return Err(PatchError::InvalidOp("operation must be an object".into()));
    }
    let name = entry
        .get("op")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PatchError::InvalidOp("missing op".into()))?;
    let kind = PatchKind::from_str(name)?;
    let path = entry
        .get("path")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PatchError::InvalidOp("path must be a string".into()))?;
    let value = entry.get("value");
    match (kind.has_value(), value.is_some()) {
        (true, false) => Err(PatchError::InvalidOp(format!(
            "{} requires a value",
            kind.as_str()
        ))),
        (false, true) => Err(PatchError::InvalidOp(
            "remove must not carry a value".into(),
        )),
        _ => Ok(PatchEntry { kind, path, value }),
    }
}

/// Append one operation object to `patches`, cloning `value` into its arena.
///
/// The caller has already checked that `patches` is array-shaped.
pub(crate) fn push_entry(
    patches: &mut Document,
    kind: PatchKind,
    path: &str,
    value: Option<ValueRef<'_>>,
) {
    let mut members = IndexMap::with_capacity(3);
    members.insert(
        "op".to_string(),
        patches.alloc(Node::String(kind.as_str().to_string())),
    );
    members.insert("path".to_string(), patches.alloc(Node::String(path.to_string())));
    if let Some(value) = value {
        members.insert("value".to_string(), patches.import(value));
    }
    let entry = patches.alloc(Node::Object(members));
    push_detached(patches, entry);
}

/// Append every element of the patch set `src` to `patches`, in order.
pub(crate) fn push_all(patches: &mut Document, src: &Document) -> usize {
    let items = src.root_ref().as_array().unwrap_or_default();
    for &item in items {
        let copy = patches.import(src.value(item));
        push_detached(patches, copy);
    }
    items.len()
}

fn push_detached(patches: &mut Document, id: NodeId) {
    let root = patches.root();
    match patches.node_mut(root) {
        Some(Node::Array(items)) => items.push(id),
        _ => patches.release(id),
    }
}

/// Validate a wire patch set and store it as a patch set document.
pub fn load_patch_set(v: &Value) -> Result<Document, PatchError> {
    from_json_patch(v)?;
    Ok(Document::from_json(v))
}

/// Build a patch set document from owned operations.
pub fn patch_set_from_ops(ops: &[Op]) -> Document {
    Document::from_json(&to_json_patch(ops))
}
