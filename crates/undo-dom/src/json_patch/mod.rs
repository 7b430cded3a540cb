//! Patch sets: the add/replace/remove subset of RFC 6902 JSON Patch.
//!
//! # Modules
//!
//! - [`types`]: operation kinds, owned operations and [`PatchError`]
//! - [`codec::json`]: wire format conversion
//! - [`patch_set`]: patch sets stored as documents
//! - [`builder`]: [`PatchBuilder`], which records changes into patch sets

pub mod builder;
pub mod codec;
pub mod patch_set;
pub mod types;

pub use builder::PatchBuilder;
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use patch_set::{load_patch_set, patch_entries, patch_set_from_ops, PatchEntry};
pub use types::{Op, PatchError, PatchKind};
