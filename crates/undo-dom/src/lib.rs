//! undo-dom — change recording and replay for undo/redo of entity documents.
//!
//! Edits to a hierarchical entity document are captured as ordered patch
//! sets (`add`, `replace`, `remove` addressed by JSON Pointer paths) and
//! replayed forward or backward against the live document.
//!
//! - [`dom`]: arena-backed [`Document`] and path resolution
//! - [`json_patch`]: patch set model, wire codec and [`PatchBuilder`]
//! - [`json_patch_diff`]: the [`DiffGenerator`] collaborator and [`StructuralDiff`]
//! - [`instance_dom`]: mutations of a live document and patch replay
//! - [`undo`]: redo/undo patch pairs
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use undo_dom::{Document, InstanceDomOptions, PatchBuilder, StructuralDiff, UndoPatch};
//!
//! let before = Document::from_json(&json!({"Name": "Wheel", "Radius": 1}));
//! let after = Document::from_json(&json!({"Name": "Wheel", "Radius": 2}));
//! let mut instance = Document::from_json(&json!({"Entities": {"E1": {"Name": "Wheel", "Radius": 1}}}));
//!
//! let builder = PatchBuilder::with_differ(&StructuralDiff);
//! let record = UndoPatch::capture_update(&builder, before.root_ref(), after.root_ref(), "/Entities/E1")?;
//! assert_eq!(
//!     record.redo.to_json(),
//!     json!([{"op": "replace", "path": "/Entities/E1/Radius", "value": 2}])
//! );
//!
//! let options = InstanceDomOptions::default();
//! record.apply_redo(&mut instance, &options)?;
//! assert_eq!(instance.get("/Entities/E1").unwrap(), after.root_ref());
//! record.apply_undo(&mut instance, &options)?;
//! assert_eq!(instance.get("/Entities/E1").unwrap(), before.root_ref());
//! # Ok::<(), undo_dom::PatchError>(())
//! ```

pub mod dom;
pub mod instance_dom;
pub mod json_cli;
pub mod json_patch;
pub mod json_patch_diff;
pub mod undo;

pub use dom::{Document, DomError, Node, NodeId, NodeKind, ValueRef};
pub use instance_dom::{
    apply_patch_set, remove_value_in_instance_dom, update_entity_in_instance_dom,
    update_entity_in_instance_dom_with_options, InstanceDomOptions,
};
pub use json_patch::{Op, PatchBuilder, PatchEntry, PatchError, PatchKind};
pub use json_patch_diff::{prefix_paths, DiffGenerator, StructuralDiff};
pub use undo::UndoPatch;
