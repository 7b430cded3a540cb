//! Core types for the patch module.

use serde_json::Value;
use thiserror::Error;
use undo_dom_pointer::JsonPointerError;

use crate::dom::DomError;

// ── Error ─────────────────────────────────────────────────────────────────

/// Every failure the patch builder, the diff collaborator and the instance
/// mutator can report. None of them abort the process.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// The patch set argument is not array-shaped.
    #[error("PRECONDITION_VIOLATION: {0}")]
    PreconditionViolation(String),
    /// An operation kind the called entry point does not accept.
    #[error("UNSUPPORTED_OPERATION: {0}")]
    UnsupportedOperation(String),
    /// A required collaborator (the diff generator) was not provided.
    #[error("MISSING_COLLABORATOR: {0}")]
    MissingCollaborator(&'static str),
    /// A path did not resolve against the target document.
    #[error("PATH_RESOLUTION: {path}: {source}")]
    PathResolution {
        path: String,
        #[source]
        source: DomError,
    },
    /// A path string is not a well-formed pointer.
    #[error("INVALID_PATH: {path}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: JsonPointerError,
    },
    /// A serialized operation is malformed.
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

impl PatchError {
    pub(crate) fn resolution(path: &str, source: DomError) -> Self {
        match source {
            DomError::Pointer(source) => PatchError::InvalidPath {
                path: path.to_string(),
                source,
            },
            source => PatchError::PathResolution {
                path: path.to_string(),
                source,
            },
        }
    }

    pub(crate) fn invalid_path(path: &str, source: impl Into<JsonPointerError>) -> Self {
        PatchError::InvalidPath {
            path: path.to_string(),
            source: source.into(),
        }
    }
}

// ── Kind ──────────────────────────────────────────────────────────────────

/// The operation vocabulary: the add/replace/remove subset of RFC 6902.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    Add,
    Replace,
    Remove,
}

impl PatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchKind::Add => "add",
            PatchKind::Replace => "replace",
            PatchKind::Remove => "remove",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, PatchError> {
        match s {
            "add" => Ok(PatchKind::Add),
            "replace" => Ok(PatchKind::Replace),
            "remove" => Ok(PatchKind::Remove),
            other => Err(PatchError::UnsupportedOperation(format!(
                "unknown op: {other}"
            ))),
        }
    }

    /// Whether operations of this kind carry a `value`.
    pub fn has_value(&self) -> bool {
        !matches!(self, PatchKind::Remove)
    }
}

// ── Op ────────────────────────────────────────────────────────────────────

/// An owned patch operation, detached from any document.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: String, value: Value },
    Replace { path: String, value: Value },
    Remove { path: String },
}

impl Op {
    pub fn kind(&self) -> PatchKind {
        match self {
            Op::Add { .. } => PatchKind::Add,
            Op::Replace { .. } => PatchKind::Replace,
            Op::Remove { .. } => PatchKind::Remove,
        }
    }

    pub fn op_name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn path(&self) -> &str {
        match self {
            Op::Add { path, .. } | Op::Replace { path, .. } | Op::Remove { path } => path,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Op::Add { value, .. } | Op::Replace { value, .. } => Some(value),
            Op::Remove { .. } => None,
        }
    }
}
