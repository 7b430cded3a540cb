//! Core logic behind the command-line tools.
//!
//! - `undo-dom-diff`  — print the patch set that turns one entity into another
//! - `undo-dom-apply` — replay a patch set against a document

use serde_json::Value;
use thiserror::Error;

use crate::dom::Document;
use crate::instance_dom::{apply_patch_set, InstanceDomOptions};
use crate::json_patch::{load_patch_set, PatchBuilder, PatchError};
use crate::json_patch_diff::StructuralDiff;
use crate::undo::UndoPatch;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Patch(#[from] PatchError),
}

// ── undo-dom-diff ─────────────────────────────────────────────────────────

/// Diff two entity documents and rebase the result onto `alias_path`.
///
/// Returns a pretty-printed object with `redo` and `undo` patch arrays.
pub fn diff_documents(before_json: &str, after_json: &str, alias_path: &str) -> Result<String, CliError> {
    let before = Document::from_json(&serde_json::from_str::<Value>(before_json)?);
    let after = Document::from_json(&serde_json::from_str::<Value>(after_json)?);
    let differ = StructuralDiff::new();
    let builder = PatchBuilder::with_differ(&differ);
    let record = UndoPatch::capture_update(&builder, before.root_ref(), after.root_ref(), alias_path)?;
    let out = serde_json::json!({
        "redo": record.redo.to_json(),
        "undo": record.undo.to_json(),
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

// ── undo-dom-apply ────────────────────────────────────────────────────────

/// Replay the patch set `patch_json` against the document `doc_json`.
///
/// Missing intermediate containers are created unless `strict` is set.
/// Returns the resulting document as a pretty-printed JSON string.
pub fn apply_patch_document(doc_json: &str, patch_json: &str, strict: bool) -> Result<String, CliError> {
    let mut doc = Document::from_json(&serde_json::from_str::<Value>(doc_json)?);
    let patches = load_patch_set(&serde_json::from_str::<Value>(patch_json)?)?;
    let options = InstanceDomOptions {
        create_intermediates: !strict,
        ..InstanceDomOptions::default()
    };
    apply_patch_set(&mut doc, &patches, &options)?;
    Ok(serde_json::to_string_pretty(&doc.to_json())?)
}

// ── Tests ─────────────────────────────────────────────────────────────────
