// SPDX-License-Identifier: MIT OR Apache-2.0
//! Write helpers and path validation

use jqpath_core::{DEFAULT_SEPARATOR, Path, PathInput, Result, normalize};
use jqpath_ops::{ApplyOptions, Operation, apply};
use serde_json::Value;

/// Set `value` at every location `path` reaches, without creating missing
/// containers
///
/// Returns the number of locations written.
///
/// # Errors
///
/// See [`apply`].
pub fn set<'p>(document: &mut Value, path: impl Into<PathInput<'p>>, value: Value) -> Result<usize> {
    set_with(document, path, value, &ApplyOptions::default())
}

/// [`set`] with explicit options
///
/// # Errors
///
/// See [`apply`].
pub fn set_with<'p>(
    document: &mut Value,
    path: impl Into<PathInput<'p>>,
    value: Value,
    options: &ApplyOptions,
) -> Result<usize> {
    let path = normalize(path, DEFAULT_SEPARATOR)?;
    apply(document, &path, Operation::Set(value), options)
}

/// Delete every location `path` reaches
///
/// # Errors
///
/// See [`apply`].
pub fn delete<'p>(document: &mut Value, path: impl Into<PathInput<'p>>) -> Result<usize> {
    delete_with(document, path, &ApplyOptions::default())
}

/// [`delete`] with explicit options
///
/// # Errors
///
/// See [`apply`].
pub fn delete_with<'p>(
    document: &mut Value,
    path: impl Into<PathInput<'p>>,
    options: &ApplyOptions,
) -> Result<usize> {
    let path = normalize(path, DEFAULT_SEPARATOR)?;
    apply(document, &path, Operation::Delete, options)
}

/// Whether `text` parses as a path with the default separator
#[must_use]
pub fn is_valid_path(text: &str) -> bool {
    jqpath_core::is_valid(text, DEFAULT_SEPARATOR)
}

/// Parse `text`, reporting where it fails
///
/// # Errors
///
/// Returns [`jqpath_core::PathError::Syntax`] with the byte position of the
/// problem.
pub fn validate_path(text: &str, separator: char) -> Result<Path> {
    normalize(text, separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jqpath_core::{ErrorKind, PathError};
    use serde_json::json;

    #[test]
    fn test_absent_read_strict_write() {
        let mut doc = json!({});
        assert_eq!(crate::get(&doc, "a.b").unwrap(), None);
        let err = set(&mut doc, "a.b", json!(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        set_with(&mut doc, "a.b", json!(1), &ApplyOptions::default().create_missing()).unwrap();
        assert_eq!(doc, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_delete_helpers() {
        let mut doc = json!({"xs": [1, 2, 3]});
        assert_eq!(delete(&mut doc, "xs[-1]").unwrap(), 1);
        assert_eq!(doc, json!({"xs": [1, 2]}));
        assert!(delete(&mut doc, "xs[9]").is_err());
        let lenient = ApplyOptions::default().create_missing();
        assert_eq!(delete_with(&mut doc, "xs[9]", &lenient).unwrap(), 0);
    }

    #[test]
    fn test_validation() {
        assert!(is_valid_path("a.b[0]"));
        assert!(!is_valid_path(".a"));
        let err = validate_path("a[?(@.x~1)]", '.').unwrap_err();
        assert!(matches!(err, PathError::Syntax { .. }));
        let path = validate_path("a/b", '/').unwrap();
        assert_eq!(path.len(), 2);
    }
}
