// SPDX-License-Identifier: MIT OR Apache-2.0
//! Caller-facing read wrapper
//!
//! [`extract`] shapes the raw match stream of [`find`]: a path without fan-out
//! steps gives one value (or the caller's default), a fan-out path gives
//! every matched value, and `with_paths` gives `(path, value)` pairs.

use jqpath_core::{DEFAULT_SEPARATOR, PathInput, Result, normalize};
use jqpath_ops::{FindOptions, find, find_first};
use serde_json::Value;

/// Options for [`extract`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Separator used to parse string paths and render result paths
    pub separator: char,
    /// Stop after the first match
    pub only_first: bool,
    /// Stop after this many matches
    pub max_results: Option<usize>,
    /// Return `(path, value)` pairs
    pub with_paths: bool,
    /// Value returned for a single-valued path that matches nothing
    pub default: Option<Value>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            only_first: false,
            max_results: None,
            with_paths: false,
            default: None,
        }
    }
}

impl ExtractOptions {
    /// Use a custom separator
    #[must_use]
    pub const fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Stop after the first match
    #[must_use]
    pub const fn first(mut self) -> Self {
        self.only_first = true;
        self
    }

    /// Stop after `n` matches
    #[must_use]
    pub const fn max_results(mut self, n: usize) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Return matched paths along with values
    #[must_use]
    pub const fn with_paths(mut self) -> Self {
        self.with_paths = true;
        self
    }

    /// Fall back to `value` when a single-valued path matches nothing
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    const fn find_options(&self) -> FindOptions {
        FindOptions {
            only_first: self.only_first,
            max_results: self.max_results,
        }
    }
}

/// Result of [`extract`]
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// The path has no fan-out step
    Single(Option<Value>),
    /// The path fans out
    Many(Vec<Value>),
    /// Paths were requested
    WithPaths(Vec<(String, Value)>),
}

impl Extracted {
    /// Collapse into one JSON value
    ///
    /// `Single(None)` becomes `null`, `Many` an array, and `WithPaths` a map
    /// from path to value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Single(value) => value.unwrap_or(Value::Null),
            Self::Many(values) => Value::Array(values),
            Self::WithPaths(pairs) => Value::Object(pairs.into_iter().collect()),
        }
    }

    /// Number of values held
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(value) => usize::from(value.is_some()),
            Self::Many(values) => values.len(),
            Self::WithPaths(pairs) => pairs.len(),
        }
    }

    /// True when nothing matched and no default was given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read `path` from `document`, shaped by the path's fan-out
///
/// # Errors
///
/// Returns [`jqpath_core::PathError::Syntax`] when the path does not parse.
/// Absence is never an error.
pub fn extract<'p>(
    document: &Value,
    path: impl Into<PathInput<'p>>,
    options: &ExtractOptions,
) -> Result<Extracted> {
    let path = normalize(path, options.separator)?;
    let matches = find(document, &path, &options.find_options());

    let extracted = if options.with_paths {
        Extracted::WithPaths(
            matches
                .map(|(at, value)| (at.to_string_with(options.separator), value.clone()))
                .collect(),
        )
    } else if path.is_concrete() {
        let found = matches.values().next().cloned();
        Extracted::Single(found.or_else(|| options.default.clone()))
    } else {
        Extracted::Many(matches.values().cloned().collect())
    };
    tracing::debug!(path = %path, results = extracted.len(), "extract");
    Ok(extracted)
}

/// First value at `path`, borrowed from the document
///
/// # Errors
///
/// Returns [`jqpath_core::PathError::Syntax`] when the path does not parse.
pub fn get<'a, 'p>(document: &'a Value, path: impl Into<PathInput<'p>>) -> Result<Option<&'a Value>> {
    let path = normalize(path, DEFAULT_SEPARATOR)?;
    Ok(find_first(document, &path).map(|(_, value)| value))
}

/// Value at `path`, or `default` when nothing matches
///
/// # Errors
///
/// Returns [`jqpath_core::PathError::Syntax`] when the path does not parse.
pub fn get_or<'p>(document: &Value, path: impl Into<PathInput<'p>>, default: Value) -> Result<Value> {
    Ok(get(document, path)?.cloned().unwrap_or(default))
}

/// Whether `path` matches anything in `document`
///
/// # Errors
///
/// Returns [`jqpath_core::PathError::Syntax`] when the path does not parse.
pub fn exists<'p>(document: &Value, path: impl Into<PathInput<'p>>) -> Result<bool> {
    Ok(get(document, path)?.is_some())
}
