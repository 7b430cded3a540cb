//! Path resolution and structural edits on a [`Document`].
//!
//! Set semantics follow the instance-document model rather than RFC 6902
//! `add`: a set on an existing array element overwrites it in place, an
//! index equal to the array length (or `-`) appends, and anything past the
//! end is rejected. Object keys are inserted or overwritten in place.

use indexmap::IndexMap;
use serde_json::Value;
use undo_dom_pointer::{
    parse_json_pointer, validate_path, ArrayStep, JsonPointerError, ValidationError,
    MAX_PATH_LENGTH,
};

use super::{Document, DomError, Node, NodeId, ValueRef};

impl Document {
    /// Resolve `path` to a node handle.
    pub fn resolve(&self, path: &[String]) -> Result<NodeId, DomError> {
        check_depth(path)?;
        let mut current = self.root;
        for step in path {
            current = self.child(current, step)?.ok_or(DomError::NotFound)?;
        }
        Ok(current)
    }

    /// Parse `pointer` and resolve it.
    pub fn resolve_pointer(&self, pointer: &str) -> Result<NodeId, DomError> {
        let path = parse_json_pointer(pointer)?;
        self.resolve(&path)
    }

    /// The value at `pointer`, if it resolves.
    pub fn get(&self, pointer: &str) -> Option<ValueRef<'_>> {
        self.resolve_pointer(pointer).ok().map(|id| self.value(id))
    }

    /// Deep-clone `value` from another document and store it at `path`.
    ///
    /// With `create_intermediates`, missing containers along the way are
    /// created: an array when the step below them is an index or `-`, an
    /// object otherwise. On error the document is left untouched.
    ///
    /// An index past the end of an array is rejected with
    /// [`DomError::InvalidIndex`] rather than padding the array with nulls.
    /// No node may end up deeper than [`MAX_PATH_LENGTH`] steps below the root.
    pub fn set_value(
        &mut self,
        path: &[String],
        value: ValueRef<'_>,
        create_intermediates: bool,
    ) -> Result<(), DomError> {
        check_fits(path, value.depth())?;
        let id = self.import(value);
        self.set_node(path, id, create_intermediates)
    }

    /// Like [`Document::set_value`] with a JSON source.
    pub fn set_json(
        &mut self,
        path: &[String],
        value: &Value,
        create_intermediates: bool,
    ) -> Result<(), DomError> {
        let id = self.import_json(value);
        self.set_node(path, id, create_intermediates)
    }

    /// Remove the node at `path` from its parent and release it.
    pub fn erase(&mut self, path: &[String]) -> Result<(), DomError> {
        check_depth(path)?;
        let Some((last, parents)) = path.split_last() else {
            return Err(DomError::InvalidTarget);
        };
        let parent = self.resolve(parents)?;
        let removed = match self.node_mut(parent) {
            Some(Node::Object(members)) => members.shift_remove(last).ok_or(DomError::NotFound)?,
            Some(Node::Array(items)) => match ArrayStep::classify(last) {
                ArrayStep::Index(idx) if idx < items.len() => items.remove(idx),
                ArrayStep::Index(_) => return Err(DomError::NotFound),
                ArrayStep::Append | ArrayStep::Invalid => return Err(DomError::InvalidIndex),
            },
            Some(_) => return Err(DomError::InvalidTarget),
            None => return Err(DomError::NotFound),
        };
        self.release(removed);
        Ok(())
    }

    /// Attach the detached node `id` at `path`. Consumes `id` either way.
    pub(crate) fn set_node(
        &mut self,
        path: &[String],
        id: NodeId,
        create_intermediates: bool,
    ) -> Result<(), DomError> {
        let result = self.try_set_node(path, id, create_intermediates);
        if result.is_err() {
            self.release(id);
        }
        result
    }

    fn try_set_node(
        &mut self,
        path: &[String],
        id: NodeId,
        create_intermediates: bool,
    ) -> Result<(), DomError> {
        check_fits(path, self.value(id).depth())?;
        let Some((last, parents)) = path.split_last() else {
            self.replace_root(id);
            return Ok(());
        };

        // Walk the existing prefix without touching anything.
        let mut current = self.root;
        let mut depth = 0;
        while depth < parents.len() {
            match self.child(current, &parents[depth])? {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => break,
            }
        }

        let missing = &parents[depth..];
        if missing.is_empty() {
            self.child(current, last)?;
        } else {
            if !create_intermediates {
                return Err(DomError::NotFound);
            }
            // Every step below the first created container lands in a fresh,
            // empty container; an array one only accepts its first slot.
            for step in missing[1..].iter().chain(std::iter::once(last)) {
                if let ArrayStep::Index(idx) = ArrayStep::classify(step) {
                    if idx != 0 {
                        return Err(DomError::InvalidIndex);
                    }
                }
            }
        }

        for (i, step) in missing.iter().enumerate() {
            let below = missing.get(i + 1).unwrap_or(last);
            let container = if ArrayStep::wants_array(below) {
                Node::Array(Vec::new())
            } else {
                Node::Object(IndexMap::new())
            };
            let created = self.alloc(container);
            self.place(current, step, created)?;
            current = created;
        }
        self.place(current, last, id)
    }

    /// Look up `step` under `parent`.
    ///
    /// `Ok(None)` means the slot is absent but could be filled by a set
    /// (a missing object key, or the append position of an array).
    fn child(&self, parent: NodeId, step: &str) -> Result<Option<NodeId>, DomError> {
        match self.node(parent) {
            Some(Node::Object(members)) => Ok(members.get(step).copied()),
            Some(Node::Array(items)) => match ArrayStep::classify(step) {
                ArrayStep::Index(idx) if idx < items.len() => Ok(Some(items[idx])),
                ArrayStep::Index(idx) if idx == items.len() => Ok(None),
                ArrayStep::Append => Ok(None),
                ArrayStep::Index(_) | ArrayStep::Invalid => Err(DomError::InvalidIndex),
            },
            Some(_) => Err(DomError::InvalidTarget),
            None => Err(DomError::NotFound),
        }
    }

    /// Store `id` under `parent` at `step`, releasing whatever it replaces.
    fn place(&mut self, parent: NodeId, step: &str, id: NodeId) -> Result<(), DomError> {
        let replaced = match self.node_mut(parent) {
            Some(Node::Object(members)) => members.insert(step.to_string(), id),
            Some(Node::Array(items)) => match ArrayStep::classify(step) {
                ArrayStep::Index(idx) if idx < items.len() => {
                    Some(std::mem::replace(&mut items[idx], id))
                }
                ArrayStep::Index(idx) if idx == items.len() => {
                    items.push(id);
                    None
                }
                ArrayStep::Append => {
                    items.push(id);
                    None
                }
                ArrayStep::Index(_) | ArrayStep::Invalid => return Err(DomError::InvalidIndex),
            },
            Some(_) => return Err(DomError::InvalidTarget),
            None => return Err(DomError::NotFound),
        };
        if let Some(old) = replaced {
            self.release(old);
        }
        Ok(())
    }
}

fn check_depth(path: &[String]) -> Result<(), DomError> {
    validate_path(path).map_err(|e| DomError::Pointer(e.into()))
}

/// A value `depth` levels deep placed at `path` must stay within the cap.
fn check_fits(path: &[String], depth: usize) -> Result<(), DomError> {
    check_depth(path)?;
    if path.len() + depth > MAX_PATH_LENGTH {
        return Err(JsonPointerError::from(ValidationError::PathTooLong).into());
    }
    Ok(())
}
