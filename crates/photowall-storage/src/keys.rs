//! Storage key validation shared by both backends.
//!
//! Objects are keyed by the literal upload filename. The file share is a
//! hierarchical namespace, so a filename with separators or traversal
//! sequences would address entries outside the share root; both backends
//! refuse such keys before any request is sent.

use crate::traits::{StorageError, StorageResult};

/// Validate a storage key. Keys must be a single non-empty path segment:
/// no `/` or `\`, no `..`, no control characters.
pub fn validate_key(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidKey("empty filename".to_string()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "filename contains path separators: {name}"
        )));
    }
    if name.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "filename contains traversal sequence: {name}"
        )));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidKey(
            "filename contains control characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinary_filenames_accepted() {
        assert!(validate_key("cat.png").is_ok());
        assert!(validate_key("holiday photo (1).jpeg").is_ok());
        assert!(validate_key("IMG_0042.JPG").is_ok());
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(matches!(
            validate_key("../../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("..\\boot.ini"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("a..b.png"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_separators_rejected() {
        assert!(validate_key("dir/cat.png").is_err());
        assert!(validate_key("/cat.png").is_err());
        assert!(validate_key("dir\\cat.png").is_err());
    }

    #[test]
    fn test_empty_and_control_rejected() {
        assert!(validate_key("").is_err());
        assert!(validate_key("cat\n.png").is_err());
    }
}
