// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for jqpath operations
//!
//! Reads never fail for absent data: a missing key or an out-of-range index
//! simply produces no match. Every variant here is a caller-visible failure
//! of path syntax or of a write that could not be carried out.

use thiserror::Error;

/// Coarse classification of a [`PathError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed path string or structured path
    Syntax,
    /// A required segment is missing on the write side
    NotFound,
    /// Step kind disagrees with node kind
    TypeMismatch,
    /// Index out of range after negative-index adjustment
    Index,
}

/// Errors produced by normalization and mutation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path could not be parsed
    #[error("path syntax error at position {position}: {message}")]
    Syntax {
        /// What was wrong
        message: String,
        /// Byte offset in the path string (element index for structured paths)
        position: usize,
    },

    /// Navigation hit a missing segment while writing without `create_missing`
    #[error("path not found: missing segment '{segment}' under '{path}'")]
    NotFound {
        /// The segment that does not exist
        segment: String,
        /// The concrete path walked before the missing segment
        path: String,
    },

    /// A step was applied to a node of the wrong kind
    #[error("type mismatch: step '{step}' expects a {expected}, found {found}")]
    TypeMismatch {
        /// The offending step, rendered in path syntax
        step: String,
        /// Node kind the step needs
        expected: &'static str,
        /// Node kind actually present
        found: &'static str,
    },

    /// An index resolved outside the sequence
    #[error("index {index} out of range (resolved to {resolved}, length {len})")]
    Index {
        /// Index as written in the path
        index: i64,
        /// Index after negative-index adjustment
        resolved: i64,
        /// Length of the sequence at the time of the write
        len: usize,
    },
}

impl PathError {
    /// Build a syntax error at a byte position
    #[must_use]
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Classification of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::Index { .. } => ErrorKind::Index,
        }
    }

    /// Whether this error came from path parsing
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

/// Result alias used throughout jqpath
pub type Result<T> = std::result::Result<T, PathError>;
