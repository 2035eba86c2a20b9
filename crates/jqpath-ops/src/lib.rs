// SPDX-License-Identifier: MIT OR Apache-2.0
//! Traversal and mutation engines for jqpath
//!
//! - [`find`] - lazy, lenient read-side traversal
//! - [`apply`] - strict, in-place set and delete
//!
//! Both engines take a normalized [`jqpath_core::Path`] and report locations
//! as [`jqpath_core::ConcretePath`]s.

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Set and delete
pub mod apply;
/// Find
pub mod find;

pub use apply::{ApplyOptions, Operation, apply};
pub use find::{FindOptions, Matches, find, find_first};
