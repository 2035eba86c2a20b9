// SPDX-License-Identifier: MIT OR Apache-2.0
//! # jqpath
//!
//! Path queries and structural mutation for JSON documents.
//!
//! Address nested values with a compact path language:
//!
//! - dotted keys: `store.book`
//! - indices, negative from the end: `items[0]`, `items[-1]`
//! - wildcards: `users.*`, `users[*]`
//! - conditional selectors: `users[?(@.active==true)]`
//! - quoted keys for awkward names: `headers["content-type"]`
//!
//! Reads are absence-tolerant; writes are strict unless told to create
//! missing containers.
//!
//! ```
//! use serde_json::json;
//!
//! let mut doc = json!({"users": [{"name": "John", "active": true}]});
//! assert_eq!(jqpath::get(&doc, "users[-1].name").unwrap(), Some(&json!("John")));
//!
//! jqpath::set(&mut doc, "users[0].role", json!("admin")).unwrap();
//! assert_eq!(doc["users"][0]["role"], json!("admin"));
//! ```
//!
//! The engines live in their own crates and are re-exported here:
//! [`jqpath_core`] (paths, selectors, errors), [`jqpath_ops`] (`find`,
//! `apply`), [`jqpath_flat`] and [`jqpath_merge`].

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

mod extract;
mod write;

pub use extract::{ExtractOptions, Extracted, exists, extract, get, get_or};
pub use write::{delete, delete_with, is_valid_path, set, set_with, validate_path};

pub use jqpath_core::{
    Comparator, ConcretePath, DEFAULT_SEPARATOR, ErrorKind, Literal, Path, PathError, PathInput,
    Predicate, Result, Segment, Step, normalize,
};
pub use jqpath_flat::{FlattenOptions, flatten, unflatten};
pub use jqpath_merge::{ListStrategy, MergeOptions, merge, merge_into, merge_many};
pub use jqpath_ops::{ApplyOptions, FindOptions, Matches, Operation, apply, find, find_first};

