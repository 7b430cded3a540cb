//! Path syntax for undo-dom.
//!
//! Paths are [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901)
//! strings. They are plain data: nothing here knows about a document, so a
//! path must be resolved again every time it is used.
//!
//! # Example
//!
//! ```
//! use undo_dom_pointer::{format_json_pointer, join_pointer, parse_json_pointer};
//!
//! let path = parse_json_pointer("/Entities/Entity_1").unwrap();
//! assert_eq!(path, vec!["Entities".to_string(), "Entity_1".to_string()]);
//! assert_eq!(format_json_pointer(&path), "/Entities/Entity_1");
//!
//! // Entity-relative paths are rebased onto the entity's alias path.
//! let absolute = join_pointer("/Instances/Car/Entities/Wheel", "/Components/0").unwrap();
//! assert_eq!(absolute, "/Instances/Car/Entities/Wheel/Components/0");
//! ```

use thiserror::Error;

pub mod types;
pub use types::{ArrayStep, Path, PathStep, APPEND_STEP};

pub mod validate;
pub use validate::{validate_json_pointer, validate_path, ValidationError, MAX_PATH_LENGTH};

/// Unescapes a pointer component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// # Example
///
/// ```
/// use undo_dom_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("no-escapes"), "no-escapes");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 first, so that "~01" decodes to "~1" rather than "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a pointer component.
///
/// Per RFC 6901, `~` is replaced with `~0` and `/` is replaced with `~1`.
///
/// # Example
///
/// ```
/// use undo_dom_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a pointer string into path components.
///
/// - Empty string is the root and returns an empty path
/// - The leading `/` is stripped
/// - Each component is unescaped
///
/// # Errors
///
/// Any pointer rejected by [`validate_json_pointer`].
///
/// # Example
///
/// ```
/// use undo_dom_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
/// assert_eq!(parse_json_pointer("/foo/bar").unwrap(), vec!["foo", "bar"]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(parse_json_pointer("foo").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Path, JsonPointerError> {
    validate_json_pointer(pointer)?;
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let path: Path = pointer[1..].split('/').map(unescape_component).collect();
    validate_path(&path)?;
    Ok(path)
}

/// Format path components into a pointer string.
///
/// Returns an empty string for the root path.
///
/// # Example
///
/// ```
/// use undo_dom_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&[]), "");
/// assert_eq!(format_json_pointer(&["foo".to_string(), "bar".to_string()]), "/foo/bar");
/// ```
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Prepend `prefix` to `pointer`.
///
/// This is how entity-relative patch paths are rebased onto an alias path.
/// An empty prefix leaves the pointer unchanged and an empty pointer (a
/// root-level change of the entity) yields the prefix itself.
///
/// # Errors
///
/// Either argument failing [`validate_json_pointer`], or the joined path
/// exceeding the maximum depth.
pub fn join_pointer(prefix: &str, pointer: &str) -> Result<String, JsonPointerError> {
    validate_json_pointer(prefix)?;
    validate_json_pointer(pointer)?;
    let mut joined = String::with_capacity(prefix.len() + pointer.len());
    joined.push_str(prefix);
    joined.push_str(pointer);
    validate_json_pointer(&joined)?;
    Ok(joined)
}

/// Get the parent path of a given path.
///
/// # Errors
///
/// Returns an error if the path is the root.
pub fn parent(path: &[String]) -> Result<Path, JsonPointerError> {
    match path.split_last() {
        Some((_, init)) => Ok(init.to_vec()),
        None => Err(JsonPointerError::NoParent),
    }
}

/// Check if a string is a canonical non-negative array index.
///
/// # Example
///
/// ```
/// use undo_dom_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    let bytes = index.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

/// Whether `step` is the array append step `-`.
pub fn is_append_step(step: &str) -> bool {
    step == APPEND_STEP
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("NO_PARENT")]
    NoParent,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
