//! Forward/inverse patch pairs for one undoable edit.
//!
//! Deciding when to capture and how many records to keep belongs to the
//! caller's undo stack; this module only pairs the two directions.

use undo_dom_pointer::{format_json_pointer, parent, parse_json_pointer, ArrayStep, Path};

use crate::dom::{Document, DomError, Node, ValueRef};
use crate::instance_dom::{apply_patch_set, InstanceDomOptions};
use crate::json_patch::{PatchBuilder, PatchError, PatchKind};

/// The redo and undo patch sets of a single edit.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoPatch {
    pub redo: Document,
    pub undo: Document,
}

/// Where a set at some path lands in the current document.
enum Target<'a> {
    /// The node exists and holds this value.
    Occupied(ValueRef<'a>),
    /// `path[created]` is the first step that does not exist yet. An array
    /// append position is spelled as the concrete index it will take.
    Vacant { path: Path, created: usize },
}

fn locate<'a>(doc: &'a Document, path: &[String], pointer: &str) -> Result<Target<'a>, PatchError> {
    let mut current = doc.root_ref();
    for (depth, step) in path.iter().enumerate() {
        let next = match current.node() {
            Some(Node::Object(_)) => current.get(step),
            Some(Node::Array(items)) => match ArrayStep::classify(step) {
                ArrayStep::Index(idx) if idx < items.len() => current.at(idx),
                ArrayStep::Index(idx) if idx == items.len() => None,
                ArrayStep::Append => None,
                _ => return Err(PatchError::resolution(pointer, DomError::InvalidIndex)),
            },
            _ => return Err(PatchError::resolution(pointer, DomError::InvalidTarget)),
        };
        match next {
            Some(child) => current = child,
            None => {
                let mut concrete = path.to_vec();
                if let Some(items) = current.as_array() {
                    concrete[depth] = items.len().to_string();
                }
                return Ok(Target::Vacant {
                    path: concrete,
                    created: depth,
                });
            }
        }
    }
    Ok(Target::Occupied(current))
}

impl UndoPatch {
    /// `entity` set at `alias_path` of `instance_dom`.
    ///
    /// Undo restores what the set displaced: the previous value when the
    /// target was occupied, otherwise nothing, by removing the first
    /// container or slot the set creates. A trailing `-` is recorded as the
    /// concrete index it appends at.
    pub fn capture_add(
        instance_dom: &Document,
        entity: ValueRef<'_>,
        alias_path: &str,
    ) -> Result<Self, PatchError> {
        let path = parse_json_pointer(alias_path).map_err(|e| PatchError::invalid_path(alias_path, e))?;
        let builder = PatchBuilder::new();
        let mut redo = Document::array();
        let mut undo = Document::array();
        match locate(instance_dom, &path, alias_path)? {
            Target::Occupied(prior) => {
                builder.append_add_entity_patch(&mut redo, entity, alias_path)?;
                builder.append_update_value_patch(&mut undo, prior, alias_path, PatchKind::Replace)?;
            }
            Target::Vacant { path, created } => {
                builder.append_add_entity_patch(&mut redo, entity, &format_json_pointer(&path))?;
                builder.append_remove_patch(&mut undo, &format_json_pointer(&path[..=created]))?;
            }
        }
        Ok(Self { redo, undo })
    }

    /// The node at `alias_path` of `instance_dom` removed.
    ///
    /// Sets overwrite array slots instead of inserting, so undoing an array
    /// element removal rewrites every element from the removed index on.
    pub fn capture_remove(instance_dom: &Document, alias_path: &str) -> Result<Self, PatchError> {
        let path = parse_json_pointer(alias_path).map_err(|e| PatchError::invalid_path(alias_path, e))?;
        let Target::Occupied(removed) = locate(instance_dom, &path, alias_path)? else {
            return Err(PatchError::resolution(alias_path, DomError::NotFound));
        };
        let builder = PatchBuilder::new();
        let mut redo = Document::array();
        let mut undo = Document::array();
        builder.append_remove_patch(&mut redo, alias_path)?;

        let shifted = match (parent(&path), path.last().map(|step| ArrayStep::classify(step))) {
            (Ok(parent_path), Some(ArrayStep::Index(idx))) => {
                let parent_id = instance_dom
                    .resolve(&parent_path)
                    .map_err(|e| PatchError::resolution(alias_path, e))?;
                instance_dom
                    .value(parent_id)
                    .as_array()
                    .map(|items| (parent_path, idx, items))
            }
            _ => None,
        };
        match shifted {
            Some((mut slot, idx, items)) => {
                for (i, &item) in items.iter().enumerate().skip(idx) {
                    slot.push(i.to_string());
                    builder.append_add_entity_patch(
                        &mut undo,
                        instance_dom.value(item),
                        &format_json_pointer(&slot),
                    )?;
                    slot.pop();
                }
            }
            None => builder.append_add_entity_patch(&mut undo, removed, alias_path)?,
        }
        Ok(Self { redo, undo })
    }

    /// An entity at `alias_path` changed from `before` to `after`.
    pub fn capture_update(
        builder: &PatchBuilder<'_>,
        before: ValueRef<'_>,
        after: ValueRef<'_>,
        alias_path: &str,
    ) -> Result<Self, PatchError> {
        let mut redo = Document::array();
        let mut undo = Document::array();
        builder.generate_update_entity_patch(&mut redo, before, after, alias_path)?;
        builder.generate_update_entity_patch(&mut undo, after, before, alias_path)?;
        Ok(Self { redo, undo })
    }

    /// Whether the edit changed nothing.
    pub fn is_empty(&self) -> bool {
        self.redo.root_ref().is_empty() && self.undo.root_ref().is_empty()
    }

    pub fn apply_redo(
        &self,
        instance_dom: &mut Document,
        options: &InstanceDomOptions,
    ) -> Result<usize, PatchError> {
        apply_patch_set(instance_dom, &self.redo, options)
    }

    pub fn apply_undo(
        &self,
        instance_dom: &mut Document,
        options: &InstanceDomOptions,
    ) -> Result<usize, PatchError> {
        apply_patch_set(instance_dom, &self.undo, options)
    }
}
