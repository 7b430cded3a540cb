//! Validation functions for pointers and paths.

use thiserror::Error;

/// Maximum allowed pointer string length.
const MAX_POINTER_LENGTH: usize = 1024;

/// Maximum allowed path depth, and so the deepest node a document may hold.
pub const MAX_PATH_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("POINTER_INVALID")]
    PointerInvalid,
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("INVALID_ESCAPE")]
    InvalidEscape,
    #[error("Path too long")]
    PathTooLong,
}

/// Validate a pointer string.
///
/// # Errors
///
/// Returns an error if:
/// - The pointer is non-empty but doesn't start with `/`
/// - The pointer exceeds the maximum length (1024 bytes)
/// - A `~` is not followed by `0` or `1`
///
/// # Example
///
/// ```
/// use undo_dom_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();
/// validate_json_pointer("/Entities/Entity_1").unwrap();
/// validate_json_pointer("Entities").unwrap_err();
/// validate_json_pointer("/a~2b").unwrap_err();
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), ValidationError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(ValidationError::PointerInvalid);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(ValidationError::PointerTooLong);
    }
    let mut bytes = pointer.bytes();
    while let Some(b) = bytes.next() {
        if b == b'~' && !matches!(bytes.next(), Some(b'0') | Some(b'1')) {
            return Err(ValidationError::InvalidEscape);
        }
    }
    Ok(())
}

/// Validate a path (array of path steps).
///
/// # Errors
///
/// Returns an error if the path exceeds the maximum depth (256 steps).
///
/// # Example
///
/// ```
/// use undo_dom_pointer::validate_path;
///
/// validate_path(&["Entities".to_string(), "Entity_1".to_string()]).unwrap();
/// validate_path(&(0..300).map(|i| i.to_string()).collect::<Vec<_>>()).unwrap_err();
/// ```
pub fn validate_path(path: &[String]) -> Result<(), ValidationError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong);
    }
    Ok(())
}
