// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path-keyed map back to a nested document

use crate::FlattenOptions;
use jqpath_core::{Result, Step, normalize};
use jqpath_ops::{ApplyOptions, Operation, apply};
use serde_json::{Map, Value};

/// Rebuild a document from a flattened map
///
/// Each key is normalized with the configured separator and written with a
/// creating set, so intermediate maps and sequences appear as needed. The
/// root is a sequence when the first key starts with an index, a map
/// otherwise; the key `""` sets the root itself. An empty input gives `{}`.
///
/// # Errors
///
/// Returns [`jqpath_core::PathError::Syntax`] for a key that is not a valid
/// path, [`jqpath_core::PathError::Index`] when sequence indices are not
/// listed contiguously in ascending order, and
/// [`jqpath_core::PathError::TypeMismatch`] when two keys disagree on the
/// kind of a container.
pub fn unflatten(flat: &Map<String, Value>, options: &FlattenOptions) -> Result<Value> {
    tracing::debug!(entries = flat.len(), separator = %options.separator, "unflatten");

    let mut document: Option<Value> = None;
    let write = ApplyOptions::default().create_missing();

    for (key, value) in flat {
        if key.is_empty() {
            document = Some(value.clone());
            continue;
        }
        let path = normalize(key.as_str(), options.separator)?;
        let root = document.get_or_insert_with(|| match path.steps().first() {
            Some(Step::Index(_)) => Value::Array(Vec::new()),
            _ => Value::Object(Map::new()),
        });
        apply(root, &path, Operation::Set(value.clone()), &write)?;
    }

    Ok(document.unwrap_or_else(|| Value::Object(Map::new())))
}
