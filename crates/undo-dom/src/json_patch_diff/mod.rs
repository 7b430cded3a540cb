//! Diff generation: compute the patch set that turns one value into another.
//!
//! The builder only depends on the [`DiffGenerator`] trait; [`StructuralDiff`]
//! is the implementation shipped with the crate.

use undo_dom_pointer::{format_json_pointer, join_pointer, validate_json_pointer};

use crate::dom::{Document, Node, NodeId, ValueRef};
use crate::json_patch::patch_set::{ensure_array, push_entry};
use crate::json_patch::types::{PatchError, PatchKind};

// ── Collaborator interface ────────────────────────────────────────────────

/// A capability that computes patch sets between two value snapshots.
pub trait DiffGenerator {
    /// Reset `patches` to an empty array and fill it with the operations
    /// that transform `before` into `after`, with paths relative to them.
    fn generate_patch(
        &self,
        patches: &mut Document,
        before: ValueRef<'_>,
        after: ValueRef<'_>,
    ) -> Result<(), PatchError>;

    /// Prepend `prefix` to the path of every operation in `patches`.
    fn prefix_patch_paths(&self, patches: &mut Document, prefix: &str) -> Result<(), PatchError> {
        prefix_paths(patches, prefix)
    }
}

/// Rewrite every operation path in `patches` as `prefix + path`.
///
/// Either every path is rewritten or, on error, none is.
pub fn prefix_paths(patches: &mut Document, prefix: &str) -> Result<(), PatchError> {
    ensure_array(patches, "prefix_paths")?;
    validate_json_pointer(prefix).map_err(|e| PatchError::invalid_path(prefix, e))?;
    if prefix.is_empty() {
        return Ok(());
    }

    let mut rewrites: Vec<(NodeId, String)> = Vec::new();
    for &entry in patches.root_ref().as_array().unwrap_or_default() {
        let path = patches
            .value(entry)
            .get("path")
            .ok_or_else(|| PatchError::InvalidOp("operation without path".into()))?;
        let relative = path
            .as_str()
            .ok_or_else(|| PatchError::InvalidOp("path must be a string".into()))?;
        let joined = join_pointer(prefix, relative).map_err(|e| PatchError::invalid_path(relative, e))?;
        rewrites.push((path.id(), joined));
    }

    for (id, joined) in rewrites {
        if let Some(Node::String(path)) = patches.node_mut(id) {
            *path = joined;
        }
    }
    Ok(())
}

// ── Structural diff ───────────────────────────────────────────────────────

/// Recursive diff emitting only `add`, `replace` and `remove`.
///
/// Output is ordered so that replaying it with overwrite-on-set semantics
/// reproduces `after`:
/// - objects: `remove` for dropped keys (source order), then `add` for new
///   keys and nested diffs for shared keys (destination order);
/// - arrays: nested diffs over the common prefix, then `add` of the tail at
///   the append position, then `remove` of surplus elements from the back;
/// - anything else that differs, strings included, is a single `replace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralDiff;

impl StructuralDiff {
    pub fn new() -> Self {
        Self
    }
}

impl DiffGenerator for StructuralDiff {
    fn generate_patch(
        &self,
        patches: &mut Document,
        before: ValueRef<'_>,
        after: ValueRef<'_>,
    ) -> Result<(), PatchError> {
        *patches = Document::array();
        let mut path = Vec::new();
        diff_at_path(patches, &mut path, before, after);
        tracing::debug!(
            count = patches.root_ref().len(),
            "generated structural diff"
        );
        Ok(())
    }
}

fn diff_at_path(patches: &mut Document, path: &mut Vec<String>, src: ValueRef<'_>, dst: ValueRef<'_>) {
    if src == dst {
        return;
    }
    match (src.node(), dst.node()) {
        (Some(Node::Object(_)), Some(Node::Object(_))) => diff_obj(patches, path, src, dst),
        (Some(Node::Array(_)), Some(Node::Array(_))) => diff_arr(patches, path, src, dst),
        _ => emit(patches, path, PatchKind::Replace, Some(dst)),
    }
}

fn diff_obj(patches: &mut Document, path: &mut Vec<String>, src: ValueRef<'_>, dst: ValueRef<'_>) {
    let (Some(src_members), Some(dst_members)) = (src.as_object(), dst.as_object()) else {
        return;
    };
    for key in src_members.keys() {
        if !dst_members.contains_key(key) {
            path.push(key.clone());
            emit(patches, path, PatchKind::Remove, None);
            path.pop();
        }
    }
    for (key, &dst_id) in dst_members {
        path.push(key.clone());
        let dst_val = dst.document().value(dst_id);
        match src_members.get(key) {
            None => emit(patches, path, PatchKind::Add, Some(dst_val)),
            Some(&src_id) => diff_at_path(patches, path, src.document().value(src_id), dst_val),
        }
        path.pop();
    }
}

fn diff_arr(patches: &mut Document, path: &mut Vec<String>, src: ValueRef<'_>, dst: ValueRef<'_>) {
    let (Some(src_items), Some(dst_items)) = (src.as_array(), dst.as_array()) else {
        return;
    };
    let common = src_items.len().min(dst_items.len());
    for i in 0..common {
        path.push(i.to_string());
        diff_at_path(
            patches,
            path,
            src.document().value(src_items[i]),
            dst.document().value(dst_items[i]),
        );
        path.pop();
    }
    for (i, &dst_id) in dst_items.iter().enumerate().skip(common) {
        path.push(i.to_string());
        emit(patches, path, PatchKind::Add, Some(dst.document().value(dst_id)));
        path.pop();
    }
    // From the back so earlier indices stay valid.
    for i in (common..src_items.len()).rev() {
        path.push(i.to_string());
        emit(patches, path, PatchKind::Remove, None);
        path.pop();
    }
}

fn emit(patches: &mut Document, path: &[String], kind: PatchKind, value: Option<ValueRef<'_>>) {
    push_entry(patches, kind, &format_json_pointer(path), value);
}
