// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node views over a JSON document
//!
//! The engines never inspect `serde_json::Value` variants directly when
//! applying a step; they split a value into one of three shapes and match on
//! that instead.

use serde_json::{Map, Value};

/// Borrowed view of a document node
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Ordered string-keyed map
    Map(&'a Map<String, Value>),
    /// Ordered sequence
    Sequence(&'a [Value]),
    /// String, number, boolean or null
    Scalar(&'a Value),
}

/// Mutable view of a document node
#[derive(Debug)]
pub enum NodeMut<'a> {
    /// Ordered string-keyed map
    Map(&'a mut Map<String, Value>),
    /// Ordered sequence
    Sequence(&'a mut Vec<Value>),
    /// String, number, boolean or null
    Scalar(&'a mut Value),
}

impl<'a> From<&'a Value> for Node<'a> {
    #[inline]
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(map),
            Value::Array(items) => Self::Sequence(items),
            other => Self::Scalar(other),
        }
    }
}

impl<'a> From<&'a mut Value> for NodeMut<'a> {
    #[inline]
    fn from(value: &'a mut Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(map),
            Value::Array(items) => Self::Sequence(items),
            other => Self::Scalar(other),
        }
    }
}

impl Node<'_> {
    /// Name of the node kind, as used in error messages
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Map(_) => MAP,
            Self::Sequence(_) => SEQUENCE,
            Self::Scalar(value) => scalar_name(value),
        }
    }
}

impl NodeMut<'_> {
    /// Name of the node kind, as used in error messages
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Map(_) => MAP,
            Self::Sequence(_) => SEQUENCE,
            Self::Scalar(value) => scalar_name(value),
        }
    }
}

/// Kind name for a map node
pub const MAP: &str = "map";
/// Kind name for a sequence node
pub const SEQUENCE: &str = "sequence";

/// Name of the kind of any value
#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => MAP,
        Value::Array(_) => SEQUENCE,
        other => scalar_name(other),
    }
}

const fn scalar_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => SEQUENCE,
        Value::Object(_) => MAP,
    }
}
