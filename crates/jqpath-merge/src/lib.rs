// SPDX-License-Identifier: MIT OR Apache-2.0
//! # Deep merge
//!
//! Combines two documents into one:
//! - Maps merge key by key, recursively; new keys keep the overlay's order
//!   after the base's keys
//! - Sequences follow the [`ListStrategy`]: replaced wholesale by default,
//!   or concatenated
//! - Everything else takes the overlay's value, `null` included
//!
//! Unlike a merge patch, `null` in the overlay is a value, not a deletion.

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

mod merge;

pub use merge::{ListStrategy, MergeOptions, merge, merge_into, merge_many};
