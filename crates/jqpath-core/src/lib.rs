// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types, error handling, and path parsing for jqpath
//!
//! This crate provides the foundational types used across the jqpath crates:
//!
//! - [`error`] - Error taxonomy and Result alias
//! - [`path`] - Steps, normalized paths and concrete paths
//! - [`normalize`] - Path tokenizer and normalizer
//! - [`selector`] - Conditional selector AST and evaluator
//! - [`node`] - Map / sequence / scalar views over documents

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Error types for jqpath operations
pub mod error;
/// Node views over JSON documents
pub mod node;
/// Path tokenizer and normalizer
pub mod normalize;
/// Path and step types
pub mod path;
/// Conditional selectors
pub mod selector;

// Re-exports for convenience
pub use error::{ErrorKind, PathError, Result};
pub use node::{Node, NodeMut, kind_name};
pub use normalize::{PathInput, is_valid, normalize};
pub use path::{ConcretePath, DEFAULT_SEPARATOR, Path, Segment, Step, resolve_index};
pub use selector::{Comparator, Literal, Predicate, matches};
