// SPDX-License-Identifier: MIT OR Apache-2.0
//! # jqpath-cli
//!
//! Command-line interface for jqpath: query, update and flatten JSON with
//! path expressions.
//!
//! ## Usage
//!
//! ```bash
//! # Read one value
//! jqpath get 'users[0].name' data.json
//!
//! # Fan out, with the matched paths
//! jqpath get --paths 'users[?(@.active==true)].email' data.json
//!
//! # Write, creating missing containers
//! jqpath set --create 'meta.tags[0]' '"new"' data.json
//!
//! # Delete every inactive user
//! jqpath delete 'users[?(@.active==false)]' data.json
//!
//! # Flatten to path = value lines and back
//! jqpath --raw flatten data.json
//! jqpath unflatten flat.json
//!
//! # Deep merge, concatenating arrays
//! jqpath merge --concat base.json overlay.json
//!
//! # Check a path
//! jqpath validate 'a.b[-1]'
//! ```
//!
//! Documents are read from FILE or stdin. Set `RUST_LOG` or pass `-v` for
//! diagnostics on stderr.

#![warn(missing_docs)]

/// Logging setup
pub mod logging;
/// Output rendering
pub mod output;

pub use output::OutputOptions;
