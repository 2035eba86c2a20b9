// SPDX-License-Identifier: MIT OR Apache-2.0
//! Nested document to path-keyed map

use jqpath_core::DEFAULT_SEPARATOR;
use jqpath_core::path::{push_index, push_key};
use serde_json::{Map, Value};

/// Options for [`flatten`] and [`unflatten`](crate::unflatten)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Separator between keys
    pub separator: char,
    /// Emit empty maps and sequences as leaves instead of dropping them
    pub keep_empty: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            keep_empty: false,
        }
    }
}

impl FlattenOptions {
    /// Use a custom separator
    #[must_use]
    pub const fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Keep empty containers
    #[must_use]
    pub const fn keep_empty(mut self) -> Self {
        self.keep_empty = true;
        self
    }
}

/// Flatten `document` into a map from concrete path strings to leaves
///
/// Entries come in document order. Empty maps and sequences are omitted
/// unless `keep_empty` is set, with one exception: a sequence element that
/// would leave no entries is written as an empty container of its own kind,
/// so every sequence keeps contiguous indices. A scalar root maps to the key
/// `""`.
#[must_use]
pub fn flatten(document: &Value, options: &FlattenOptions) -> Map<String, Value> {
    let mut out = Map::new();
    let mut path = String::with_capacity(64);
    flatten_into(document, &mut path, options, &mut out);
    tracing::debug!(entries = out.len(), "flatten");
    out
}

fn flatten_into(
    value: &Value,
    path: &mut String,
    options: &FlattenOptions,
    out: &mut Map<String, Value>,
) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let len = path.len();
                push_key(path, key, options.separator);
                flatten_into(child, path, options, out);
                path.truncate(len);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                let len = path.len();
                let entries = out.len();
                push_index(path, i);
                flatten_into(child, path, options, out);
                if out.len() == entries {
                    out.insert(path.clone(), empty_like(child));
                }
                path.truncate(len);
            }
        }
        Value::Object(_) | Value::Array(_) => {
            if options.keep_empty {
                out.insert(path.clone(), value.clone());
            }
        }
        leaf => {
            out.insert(path.clone(), leaf.clone());
        }
    }
}

/// Only containers can flatten to nothing
fn empty_like(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}
