// SPDX-License-Identifier: MIT OR Apache-2.0
use anyhow::Result;
use jqpath::Extracted;
use serde::Serialize;
use serde_json::{Map, Value};

/// How results are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    /// Single-line JSON
    pub compact: bool,
    /// Strings without quotes, one result per line
    pub raw: bool,
    /// Spaces per indent level for pretty output
    pub indent: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            compact: false,
            raw: false,
            indent: 2,
        }
    }
}

/// Render one JSON value
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(value: &Value, options: &OutputOptions) -> Result<String> {
    if options.raw
        && let Value::String(s) = value
    {
        return Ok(s.clone());
    }
    if options.compact {
        return Ok(serde_json::to_string(value)?);
    }
    let indent = " ".repeat(options.indent);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Render a read result
///
/// Raw mode writes one line per value (`path = value` when paths were
/// requested); otherwise the result is a single JSON document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_extracted(extracted: Extracted, options: &OutputOptions) -> Result<String> {
    if !options.raw {
        return render(&extracted.into_value(), options);
    }
    let line_options = OutputOptions {
        compact: true,
        ..*options
    };
    let lines = match extracted {
        Extracted::Single(value) => vec![render(&value.unwrap_or(Value::Null), &line_options)?],
        Extracted::Many(values) => values
            .iter()
            .map(|value| render(value, &line_options))
            .collect::<Result<_>>()?,
        Extracted::WithPaths(pairs) => {
            return assignment_lines(pairs.iter().map(|(path, value)| (path, value)));
        }
    };
    Ok(lines.join("\n"))
}

/// Render a flattened map, as `path = value` lines in raw mode
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_flat(flat: Map<String, Value>, options: &OutputOptions) -> Result<String> {
    if options.raw {
        assignment_lines(flat.iter())
    } else {
        render(&Value::Object(flat), options)
    }
}

fn assignment_lines<'a, I>(pairs: I) -> Result<String>
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    let mut out = String::new();
    for (path, value) in pairs {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(path);
        out.push_str(" = ");
        out.push_str(&serde_json::to_string(value)?);
    }
    Ok(out)
}
