//! Type definitions for paths.

/// A single step of a path: an object key or a decimal array index.
///
/// Steps are stored unescaped; escaping only happens when a path is
/// formatted back into a pointer string.
pub type PathStep = String;

/// A parsed path. The empty path addresses the document root.
pub type Path = Vec<PathStep>;

/// The step that addresses the slot one past the end of an array.
pub const APPEND_STEP: &str = "-";

/// Classification of a single step relative to an array container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStep {
    /// A canonical index (`"0"`, `"17"`).
    Index(usize),
    /// The `-` step.
    Append,
    /// Anything else: a step that can never address an array element.
    Invalid,
}

impl ArrayStep {
    /// Classify `step` as it would be read against an array.
    pub fn classify(step: &str) -> Self {
        if crate::is_append_step(step) {
            return ArrayStep::Append;
        }
        if !crate::is_valid_index(step) {
            return ArrayStep::Invalid;
        }
        match step.parse() {
            Ok(idx) => ArrayStep::Index(idx),
            Err(_) => ArrayStep::Invalid,
        }
    }

    /// Whether a missing container addressed by this step should be an array.
    pub fn wants_array(step: &str) -> bool {
        !matches!(Self::classify(step), ArrayStep::Invalid)
    }
}
