// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path types
//!
//! A [`Path`] is the normalized, immutable form of a path expression: an
//! ordered list of [`Step`]s. It holds no document state, so one `Path` can be
//! applied to any number of documents. Negative indices stay negative here and
//! are resolved against the live sequence length at traversal time.
//!
//! A [`ConcretePath`] is what traversal reports back: only keys and resolved,
//! non-negative indices, naming exactly one location.

use crate::error::{PathError, Result};
use crate::selector::Predicate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Default separator between keys
pub const DEFAULT_SEPARATOR: char = '.';

/// One atomic unit of a normalized path
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Map member access
    Key(String),
    /// Sequence access; negative values count from the end
    Index(i64),
    /// Every member of a map or element of a sequence
    Wildcard,
    /// Every element of a sequence (or the node itself) satisfying a predicate
    Selector(Predicate),
}

impl Step {
    /// Whether this step can expand to more than one location
    #[inline]
    #[must_use]
    pub const fn is_fan_out(&self) -> bool {
        matches!(self, Self::Wildcard | Self::Selector(_))
    }

    /// Render this step on its own, for error messages
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, DEFAULT_SEPARATOR);
        out
    }

    fn write_to(&self, out: &mut String, separator: char) {
        match self {
            Self::Key(key) => push_key(out, key, separator),
            Self::Index(index) => {
                out.push('[');
                out.push_str(itoa::Buffer::new().format(*index));
                out.push(']');
            }
            Self::Wildcard => out.push_str("[*]"),
            Self::Selector(predicate) => {
                out.push('[');
                out.push_str(&predicate.to_string());
                out.push(']');
            }
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for Step {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<Predicate> for Step {
    fn from(predicate: Predicate) -> Self {
        Self::Selector(predicate)
    }
}

/// A normalized path: a non-empty, immutable sequence of steps
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    steps: SmallVec<[Step; 4]>,
}

impl Path {
    /// Build a path from steps
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Syntax`] if `steps` is empty.
    pub fn from_steps<I>(steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = Step>,
    {
        let steps: SmallVec<[Step; 4]> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(PathError::syntax("empty path", 0));
        }
        Ok(Self { steps })
    }

    /// Parse a path string using the default `.` separator
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Syntax`] for malformed input.
    pub fn parse(input: &str) -> Result<Self> {
        crate::normalize::normalize(input, DEFAULT_SEPARATOR)
    }

    /// The steps of this path
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a normalized path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any step is a wildcard or selector
    #[must_use]
    pub fn has_fan_out(&self) -> bool {
        self.steps.iter().any(Step::is_fan_out)
    }

    /// Whether this path names at most one location
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        !self.has_fan_out()
    }

    /// Render with a custom separator
    #[must_use]
    pub fn to_string_with(&self, separator: char) -> String {
        let mut out = String::new();
        for step in &self.steps {
            step.write_to(&mut out, separator);
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(DEFAULT_SEPARATOR))
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&ConcretePath> for Path {
    type Error = PathError;

    /// Fails with [`PathError::Syntax`] for the root, which has no steps
    fn try_from(concrete: &ConcretePath) -> Result<Self> {
        Self::from_steps(concrete.segments().iter().map(|segment| match segment {
            Segment::Key(key) => Step::Key(key.clone()),
            Segment::Index(index) => Step::Index(i64::try_from(*index).unwrap_or(i64::MAX)),
        }))
    }
}

/// One step of a concrete path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Map key
    Key(String),
    /// Resolved sequence index
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        match self {
            Self::Key(key) => push_key(&mut out, key, DEFAULT_SEPARATOR),
            Self::Index(index) => push_index(&mut out, *index),
        }
        f.write_str(&out)
    }
}

/// A path of keys and resolved indices naming exactly one location
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConcretePath(SmallVec<[Segment; 8]>);

impl ConcretePath {
    /// The root location
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Append a segment
    #[inline]
    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// Remove the last segment
    #[inline]
    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    /// A copy of this path with one more segment
    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    /// The segments, root first
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the document root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render with a custom separator; the root renders as an empty string
    #[must_use]
    pub fn to_string_with(&self, separator: char) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            match segment {
                Segment::Key(key) => push_key(&mut out, key, separator),
                Segment::Index(index) => push_index(&mut out, *index),
            }
        }
        out
    }
}

impl fmt::Display for ConcretePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(DEFAULT_SEPARATOR))
    }
}

impl FromIterator<Segment> for ConcretePath {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resolve a possibly negative index against the current length
///
/// Negative indices count from the end (`-1` is the last element). The
/// result may still be out of range; callers decide what that means.
#[inline]
#[must_use]
pub fn resolve_index(index: i64, len: usize) -> i64 {
    if index < 0 {
        i64::try_from(len).unwrap_or(i64::MAX).saturating_add(index)
    } else {
        index
    }
}

/// Whether a key must be written as a quoted subscript
#[must_use]
pub fn needs_quoting(key: &str, separator: char) -> bool {
    key.is_empty()
        || key == "*"
        || key
            .chars()
            .any(|c| c == separator || matches!(c, '[' | ']' | '\\' | '"'))
}

/// Append a key in path syntax, adding the separator when needed
///
/// Keys that cannot be written bare are emitted as `["..."]`.
pub fn push_key(out: &mut String, key: &str, separator: char) {
    if needs_quoting(key, separator) {
        out.push('[');
        out.push_str(&serde_json::Value::String(key.to_owned()).to_string());
        out.push(']');
    } else {
        if !out.is_empty() {
            out.push(separator);
        }
        out.push_str(key);
    }
}

/// Append a resolved index in path syntax
pub fn push_index(out: &mut String, index: usize) {
    out.push('[');
    out.push_str(itoa::Buffer::new().format(index));
    out.push(']');
}
