// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flatten and unflatten for jqpath
//!
//! [`flatten`] turns a nested document into a single-level map from concrete
//! path strings to leaf values; [`unflatten`] rebuilds the document from
//! such a map. Every flattened key is a valid concrete path, so the two are
//! inverse for documents without empty containers.
//!
//! ```text
//! {"a": {"b": [1, 2]}, "c.d": true}
//!
//! a.b[0]    = 1
//! a.b[1]    = 2
//! ["c.d"]   = true
//! ```

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

mod flatten;
mod unflatten;

pub use flatten::{FlattenOptions, flatten};
pub use unflatten::unflatten;
