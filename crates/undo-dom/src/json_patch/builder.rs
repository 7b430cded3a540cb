//! Patch builder: records document changes as patch set entries.
//!
//! Every undoable change is funnelled through these entry points so that
//! one replay mechanism (see [`crate::instance_dom`]) covers all of them.
//! A call that fails leaves `patches` exactly as it was.

use undo_dom_pointer::validate_json_pointer;

use super::patch_set::{ensure_array, push_all, push_entry};
use super::types::{PatchError, PatchKind};
use crate::dom::{Document, ValueRef};
use crate::json_patch_diff::DiffGenerator;

/// Builds patch sets, optionally backed by an injected diff generator.
#[derive(Clone, Copy, Default)]
pub struct PatchBuilder<'d> {
    differ: Option<&'d dyn DiffGenerator>,
}

impl<'d> PatchBuilder<'d> {
    /// A builder without a diff generator. The update-entity entry points
    /// report [`PatchError::MissingCollaborator`].
    pub fn new() -> Self {
        Self { differ: None }
    }

    pub fn with_differ(differ: &'d dyn DiffGenerator) -> Self {
        Self {
            differ: Some(differ),
        }
    }

    fn differ(&self, caller: &'static str) -> Result<&'d dyn DiffGenerator, PatchError> {
        self.differ.ok_or(PatchError::MissingCollaborator(caller))
    }

    /// Append an `add` that places a deep copy of `new_entity` at `alias_path`.
    pub fn append_add_entity_patch(
        &self,
        patches: &mut Document,
        new_entity: ValueRef<'_>,
        alias_path: &str,
    ) -> Result<(), PatchError> {
        ensure_array(patches, "append_add_entity_patch")?;
        self.append_update_value_patch(patches, new_entity, alias_path, PatchKind::Add)
    }

    /// Append a single `add` or `replace` carrying a deep copy of `value`.
    ///
    /// `remove` has its own entry point and is rejected here.
    pub fn append_update_value_patch(
        &self,
        patches: &mut Document,
        value: ValueRef<'_>,
        path: &str,
        kind: PatchKind,
    ) -> Result<(), PatchError> {
        ensure_array(patches, "append_update_value_patch")?;
        if kind == PatchKind::Remove {
            return Err(PatchError::UnsupportedOperation(
                "append_update_value_patch: remove must use append_remove_patch".into(),
            ));
        }
        validate_json_pointer(path).map_err(|e| PatchError::invalid_path(path, e))?;
        push_entry(patches, kind, path, Some(value));
        tracing::debug!(op = kind.as_str(), path, "appended value patch");
        Ok(())
    }

    /// Append a `remove` of `path`. The entry carries no value.
    pub fn append_remove_patch(&self, patches: &mut Document, path: &str) -> Result<(), PatchError> {
        ensure_array(patches, "append_remove_patch")?;
        validate_json_pointer(path).map_err(|e| PatchError::invalid_path(path, e))?;
        push_entry(patches, PatchKind::Remove, path, None);
        tracing::debug!(op = "remove", path, "appended remove patch");
        Ok(())
    }

    /// Diff `before` against `after`, rebase the result onto `alias_path`
    /// and append it to `patches` in the generator's emission order.
    pub fn append_update_entity_patch(
        &self,
        patches: &mut Document,
        before: ValueRef<'_>,
        after: ValueRef<'_>,
        alias_path: &str,
    ) -> Result<(), PatchError> {
        ensure_array(patches, "append_update_entity_patch")?;
        let differ = self.differ("append_update_entity_patch")?;
        let generated = aliased_diff(differ, before, after, alias_path)?;
        let count = push_all(patches, &generated);
        tracing::debug!(count, alias_path, "appended entity update patches");
        Ok(())
    }

    /// Same transform as [`PatchBuilder::append_update_entity_patch`], but
    /// `patches` is replaced by the result instead of appended to.
    pub fn generate_update_entity_patch(
        &self,
        patches: &mut Document,
        before: ValueRef<'_>,
        after: ValueRef<'_>,
        alias_path: &str,
    ) -> Result<(), PatchError> {
        let differ = self.differ("generate_update_entity_patch")?;
        *patches = aliased_diff(differ, before, after, alias_path)?;
        tracing::debug!(
            count = patches.root_ref().len(),
            alias_path,
            "generated entity update patches"
        );
        Ok(())
    }
}

fn aliased_diff(
    differ: &dyn DiffGenerator,
    before: ValueRef<'_>,
    after: ValueRef<'_>,
    alias_path: &str,
) -> Result<Document, PatchError> {
    let mut generated = Document::array();
    differ.generate_patch(&mut generated, before, after)?;
    differ.prefix_patch_paths(&mut generated, alias_path)?;
    ensure_array(&generated, "diff generator")?;
    Ok(generated)
}

impl std::fmt::Debug for PatchBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchBuilder")
            .field("differ", &self.differ.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_patch_diff::StructuralDiff;
    use serde_json::json;

    #[test]
    fn add_entity_appends_clone() {
        let entity = Document::from_json(&json!({"Name": "Wheel"}));
        let mut patches = Document::array();
        PatchBuilder::new()
            .append_add_entity_patch(&mut patches, entity.root_ref(), "/Entities/E1")
            .unwrap();
        assert_eq!(
            patches.to_json(),
            json!([{"op": "add", "path": "/Entities/E1", "value": {"Name": "Wheel"}}])
        );
    }

    #[test]
    fn update_value_rejects_remove_without_appending() {
        let value = Document::from_json(&json!(1));
        let mut patches = Document::array();
        let err = PatchBuilder::new()
            .append_update_value_patch(&mut patches, value.root_ref(), "/a", PatchKind::Remove)
            .unwrap_err();
        assert!(matches!(err, PatchError::UnsupportedOperation(_)));
        assert_eq!(patches.root_ref().len(), 0);
    }

    #[test]
    fn non_array_patches_is_precondition_violation() {
        let value = Document::from_json(&json!(1));
        let mut patches = Document::object();
        let builder = PatchBuilder::with_differ(&StructuralDiff);
        assert!(matches!(
            builder.append_add_entity_patch(&mut patches, value.root_ref(), "/a"),
            Err(PatchError::PreconditionViolation(_))
        ));
        assert!(matches!(
            builder.append_remove_patch(&mut patches, "/a"),
            Err(PatchError::PreconditionViolation(_))
        ));
        assert!(matches!(
            builder.append_update_entity_patch(&mut patches, value.root_ref(), value.root_ref(), "/a"),
            Err(PatchError::PreconditionViolation(_))
        ));
        assert_eq!(patches.to_json(), json!({}));
    }

    #[test]
    fn invalid_paths_are_rejected() {
        let value = Document::from_json(&json!(1));
        let mut patches = Document::array();
        let builder = PatchBuilder::new();
        assert!(matches!(
            builder.append_update_value_patch(&mut patches, value.root_ref(), "a/b", PatchKind::Add),
            Err(PatchError::InvalidPath { .. })
        ));
        assert!(matches!(
            builder.append_remove_patch(&mut patches, "/a~"),
            Err(PatchError::InvalidPath { .. })
        ));
        assert_eq!(patches.root_ref().len(), 0);
    }

    #[test]
    fn update_entity_without_differ_is_missing_collaborator() {
        let before = Document::from_json(&json!({"x": 1}));
        let after = Document::from_json(&json!({"x": 2}));
        let mut patches = Document::array();
        let builder = PatchBuilder::new();
        assert!(matches!(
            builder.append_update_entity_patch(&mut patches, before.root_ref(), after.root_ref(), "/e"),
            Err(PatchError::MissingCollaborator(_))
        ));
        assert!(matches!(
            builder.generate_update_entity_patch(&mut patches, before.root_ref(), after.root_ref(), "/e"),
            Err(PatchError::MissingCollaborator(_))
        ));
        assert_eq!(patches.root_ref().len(), 0);
    }

    #[test]
    fn update_entity_appends_after_existing() {
        let before = Document::from_json(&json!({"x": 1}));
        let after = Document::from_json(&json!({"x": 2}));
        let mut patches = Document::from_json(&json!([{"op": "remove", "path": "/old"}]));
        PatchBuilder::with_differ(&StructuralDiff)
            .append_update_entity_patch(&mut patches, before.root_ref(), after.root_ref(), "/entities/e1")
            .unwrap();
        assert_eq!(
            patches.to_json(),
            json!([
                {"op": "remove", "path": "/old"},
                {"op": "replace", "path": "/entities/e1/x", "value": 2}
            ])
        );
    }

    #[test]
    fn generate_update_entity_overwrites() {
        let before = Document::from_json(&json!({"x": 1}));
        let after = Document::from_json(&json!({"x": 2}));
        let mut patches = Document::from_json(&json!([{"op": "remove", "path": "/old"}]));
        PatchBuilder::with_differ(&StructuralDiff)
            .generate_update_entity_patch(&mut patches, before.root_ref(), after.root_ref(), "/entities/e1")
            .unwrap();
        assert_eq!(
            patches.to_json(),
            json!([{"op": "replace", "path": "/entities/e1/x", "value": 2}])
        );
    }

    #[test]
    fn debug_shows_differ_presence() {
        assert_eq!(format!("{:?}", PatchBuilder::new()), "PatchBuilder { differ: false }");
    }
}
