//! Instance document mutator: the execution side of a recorded patch.
//!
//! These functions change a live [`Document`] directly. They serve both
//! immediate edits and undo/redo replay of patch sets captured by
//! [`crate::json_patch::PatchBuilder`].
//!
//! An empty path is a no-op for both the set and the erase entry points.

use undo_dom_pointer::parse_json_pointer;

use crate::dom::{Document, ValueRef};
use crate::json_patch::patch_set::{patch_entries, PatchEntry};
use crate::json_patch::types::{PatchError, PatchKind};

/// Behavior switches for the mutator.
#[derive(Debug, Clone)]
pub struct InstanceDomOptions {
    /// Create missing intermediate containers when setting a value.
    /// When false, a set below a missing parent fails with
    /// [`PatchError::PathResolution`].
    pub create_intermediates: bool,
    /// Make [`apply_patch_set`] all-or-nothing: on failure the document is
    /// left as it was before the call.
    pub atomic: bool,
}

impl Default for InstanceDomOptions {
    fn default() -> Self {
        Self {
            create_intermediates: true,
            atomic: true,
        }
    }
}

/// Deep-clone `entity` into `instance_dom` at `alias_path`.
pub fn update_entity_in_instance_dom(
    instance_dom: &mut Document,
    entity: ValueRef<'_>,
    alias_path: &str,
) -> Result<(), PatchError> {
    update_entity_in_instance_dom_with_options(
        instance_dom,
        entity,
        alias_path,
        &InstanceDomOptions::default(),
    )
}

pub fn update_entity_in_instance_dom_with_options(
    instance_dom: &mut Document,
    entity: ValueRef<'_>,
    alias_path: &str,
    options: &InstanceDomOptions,
) -> Result<(), PatchError> {
    if alias_path.is_empty() {
        return Ok(());
    }
    let path = parse_json_pointer(alias_path).map_err(|e| PatchError::invalid_path(alias_path, e))?;
    instance_dom
        .set_value(&path, entity, options.create_intermediates)
        .map_err(|e| PatchError::resolution(alias_path, e))?;
    tracing::debug!(path = alias_path, "set value in instance dom");
    Ok(())
}

/// Erase the node at `path` from `instance_dom`.
pub fn remove_value_in_instance_dom(instance_dom: &mut Document, path: &str) -> Result<(), PatchError> {
    if path.is_empty() {
        return Ok(());
    }
    let steps = parse_json_pointer(path).map_err(|e| PatchError::invalid_path(path, e))?;
    instance_dom
        .erase(&steps)
        .map_err(|e| PatchError::resolution(path, e))?;
    tracing::debug!(path, "removed value from instance dom");
    Ok(())
}

/// Replay every operation of `patches` against `instance_dom`, in order.
///
/// `add` sets (creating or overwriting), `replace` sets a node that must
/// already exist, `remove` erases a node that must exist. Entries with an
/// empty path are skipped like in the single-value entry points. Returns
/// the number of entries replayed.
pub fn apply_patch_set(
    instance_dom: &mut Document,
    patches: &Document,
    options: &InstanceDomOptions,
) -> Result<usize, PatchError> {
    let entries = patch_entries(patches)?;
    if !options.atomic {
        return replay(instance_dom, &entries, options);
    }
    let mut working = instance_dom.clone();
    let count = replay(&mut working, &entries, options)?;
    *instance_dom = working;
    Ok(count)
}

fn replay(
    doc: &mut Document,
    entries: &[PatchEntry<'_>],
    options: &InstanceDomOptions,
) -> Result<usize, PatchError> {
    for (index, entry) in entries.iter().enumerate() {
        let result = match (entry.kind, entry.value) {
            (PatchKind::Remove, _) => remove_value_in_instance_dom(doc, entry.path),
            (PatchKind::Replace, Some(value)) => doc
                .resolve_pointer(entry.path)
                .map_err(|e| PatchError::resolution(entry.path, e))
                .and_then(|_| {
                    update_entity_in_instance_dom_with_options(doc, value, entry.path, options)
                }),
            (PatchKind::Add, Some(value)) => {
                update_entity_in_instance_dom_with_options(doc, value, entry.path, options)
            }
            (kind, None) => Err(PatchError::InvalidOp(format!(
                "{} requires a value",
                kind.as_str()
            ))),
        };
        if let Err(err) = result {
            tracing::warn!(index, op = entry.kind.as_str(), path = entry.path, error = %err, "patch replay rejected");
            return Err(err);
        }
    }
    tracing::debug!(count = entries.len(), "replayed patch set");
    Ok(entries.len())
}
