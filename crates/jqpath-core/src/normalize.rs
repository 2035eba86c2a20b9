// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path tokenizer and normalizer
//!
//! Turns a path string such as `users[-1].tags[*]` or
//! `users[?(@.active==true)].name`, or an already structured path, into a
//! [`Path`]. Parsing is pure: no document is consulted.
//!
//! # String grammar
//!
//! ```text
//! path       := segment (separator segment)*
//! segment    := key subscript* | subscript+
//! subscript  := "[" (index | "*" | selector | quoted_key) "]"
//! index      := "-"? digit+
//! selector   := "?(@" ("." field | "[" JSON string "]")* comparator literal ")"
//! quoted_key := JSON string
//! key        := characters other than separator, "[" and "]"; "\" escapes
//! ```
//!
//! A bare `*` key is a wildcard; `\*` is the literal key `*`.

use crate::error::{PathError, Result};
use crate::path::{Path, Step};
use crate::selector::Predicate;
use serde_json::Value;
use smallvec::SmallVec;

/// Input accepted by [`normalize`]
#[derive(Debug, Clone, Copy)]
pub enum PathInput<'a> {
    /// Path string in the grammar above
    Text(&'a str),
    /// Steps that are already typed
    Steps(&'a [Step]),
    /// A JSON array of strings and integers
    ///
    /// `"*"` is a wildcard, `"?(...)"` or `"[?(...)]"` a selector, any other
    /// string a verbatim key and any integer an index. A leading backslash is
    /// dropped and the rest taken as a verbatim key, so the JSON strings
    /// `"\\*"` and `"\\?(x"` are the keys `*` and `?(x`, and `"\\\\x"`
    /// is the key `\x`.
    Json(&'a Value),
}

impl<'a> From<&'a str> for PathInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for PathInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [Step]> for PathInput<'a> {
    fn from(steps: &'a [Step]) -> Self {
        Self::Steps(steps)
    }
}

impl<'a> From<&'a Vec<Step>> for PathInput<'a> {
    fn from(steps: &'a Vec<Step>) -> Self {
        Self::Steps(steps)
    }
}

impl<'a> From<&'a Path> for PathInput<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Steps(path.steps())
    }
}

impl<'a> From<&'a Value> for PathInput<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Json(value)
    }
}

/// Normalize a path given as a string or a structured sequence
///
/// # Errors
///
/// Returns [`PathError::Syntax`] when the path is empty, starts or ends with
/// the separator, has an empty segment, has unmatched brackets, has an
/// unparseable index or selector body, or when `separator` is one of `[`,
/// `]` or `\`.
pub fn normalize<'a>(input: impl Into<PathInput<'a>>, separator: char) -> Result<Path> {
    let input = input.into();
    let path = match input {
        PathInput::Text(text) => Tokenizer::new(text, separator)?.run()?,
        PathInput::Steps(steps) => Path::from_steps(steps.iter().cloned())?,
        PathInput::Json(value) => from_json(value)?,
    };
    tracing::trace!(path = %path, steps = path.len(), "normalized path");
    Ok(path)
}

/// Check a path string without keeping the result
#[must_use]
pub fn is_valid(text: &str, separator: char) -> bool {
    normalize(text, separator).is_ok()
}

fn from_json(value: &Value) -> Result<Path> {
    let Value::Array(items) = value else {
        return Err(PathError::syntax("structured path must be an array", 0));
    };
    if items.is_empty() {
        return Err(PathError::syntax("empty path", 0));
    }

    let mut steps: SmallVec<[Step; 4]> = SmallVec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let step = match item {
            Value::String(s) if s.starts_with('\\') => Step::Key(s[1..].to_owned()),
            Value::String(s) if s == "*" => Step::Wildcard,
            Value::String(s) if s.starts_with("?(") => {
                Step::Selector(Predicate::parse(s, position)?)
            }
            Value::String(s) if s.starts_with("[?(") && s.ends_with(']') => {
                Step::Selector(Predicate::parse(&s[1..s.len() - 1], position)?)
            }
            Value::String(s) => Step::Key(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(index) => Step::Index(index),
                None => {
                    return Err(PathError::syntax(
                        format!("index {n} is not an integer"),
                        position,
                    ));
                }
            },
            other => {
                return Err(PathError::syntax(
                    format!("unsupported path element {other}"),
                    position,
                ));
            }
        };
        steps.push(step);
    }
    Path::from_steps(steps)
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    separator: char,
    ascii_separator: Option<u8>,
    steps: SmallVec<[Step; 4]>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, separator: char) -> Result<Self> {
        if matches!(separator, '[' | ']' | '\\') {
            return Err(PathError::syntax(
                format!("'{separator}' cannot be used as a separator"),
                0,
            ));
        }
        Ok(Self {
            input,
            pos: 0,
            separator,
            ascii_separator: u8::try_from(separator).ok().filter(u8::is_ascii),
            steps: SmallVec::new(),
        })
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_separator(&self) -> bool {
        self.peek() == Some(self.separator)
    }

    fn run(mut self) -> Result<Path> {
        if self.input.is_empty() {
            return Err(PathError::syntax("empty path", 0));
        }
        if self.at_separator() {
            return Err(PathError::syntax("path starts with separator", 0));
        }

        loop {
            self.segment()?;
            if self.pos == self.input.len() {
                break;
            }
            // segment() only returns at a separator or the end
            self.bump();
            if self.pos == self.input.len() {
                return Err(PathError::syntax("path ends with separator", self.pos - 1));
            }
            if self.at_separator() {
                return Err(PathError::syntax("empty segment", self.pos));
            }
        }

        Path::from_steps(self.steps)
    }

    fn segment(&mut self) -> Result<()> {
        let start = self.pos;
        let (key, escaped) = self.key()?;
        let has_key = !key.is_empty();
        if has_key {
            if key == "*" && !escaped {
                self.steps.push(Step::Wildcard);
            } else {
                self.steps.push(Step::Key(key));
            }
        }

        let mut subscripts = 0usize;
        while self.peek() == Some('[') {
            self.subscript()?;
            subscripts += 1;
        }

        if !has_key && subscripts == 0 {
            return match self.peek() {
                Some(']') => Err(PathError::syntax("unmatched ']'", self.pos)),
                _ => Err(PathError::syntax("empty segment", start)),
            };
        }

        match self.peek() {
            None => Ok(()),
            Some(c) if c == self.separator => Ok(()),
            Some(']') => Err(PathError::syntax("unmatched ']'", self.pos)),
            Some(c) => Err(PathError::syntax(
                format!("unexpected '{c}' after subscript"),
                self.pos,
            )),
        }
    }

    /// Read a bare key, unescaping as it goes
    fn key(&mut self) -> Result<(String, bool)> {
        let mut out = String::new();
        let mut escaped = false;
        loop {
            let run = self.plain_run();
            out.push_str(&self.input[self.pos..self.pos + run]);
            self.pos += run;

            if self.peek() != Some('\\') {
                return Ok((out, escaped));
            }
            let at = self.pos;
            self.bump();
            match self.bump() {
                Some(c) => out.push(c),
                None => return Err(PathError::syntax("dangling escape at end of path", at)),
            }
            escaped = true;
        }
    }

    /// Length in bytes of the run before the next separator, bracket or escape
    fn plain_run(&self) -> usize {
        let rest = &self.input[self.pos..];
        let bytes = rest.as_bytes();
        let stop = match self.ascii_separator {
            Some(sep) => memchr::memchr3(sep, b'[', b'\\', bytes).unwrap_or(bytes.len()),
            None => rest
                .find(|c| c == self.separator || c == '[' || c == '\\')
                .unwrap_or(rest.len()),
        };
        memchr::memchr(b']', &bytes[..stop]).unwrap_or(stop)
    }

    fn subscript(&mut self) -> Result<()> {
        let open = self.pos;
        self.bump();
        let rest = &self.input[self.pos..];

        let step = if rest.starts_with("?(") {
            let body_start = self.pos;
            let body_end = self.selector_end(open)?;
            let predicate = Predicate::parse(&self.input[body_start..body_end], body_start)?;
            self.pos = body_end;
            Step::Selector(predicate)
        } else if rest.starts_with('"') {
            let start = self.pos;
            let end = self.string_end(open)?;
            let key: String = serde_json::from_str(&self.input[start..end])
                .map_err(|e| PathError::syntax(format!("invalid quoted key: {e}"), start))?;
            self.pos = end;
            Step::Key(key)
        } else {
            let Some(len) = memchr::memchr(b']', rest.as_bytes()) else {
                return Err(PathError::syntax("unmatched '['", open));
            };
            let content = &rest[..len];
            let step = parse_index_or_wildcard(content, self.pos)?;
            self.pos += len;
            step
        };

        if self.peek() == Some(']') {
            self.bump();
        } else {
            return Err(PathError::syntax("unmatched '['", open));
        }
        self.steps.push(step);
        Ok(())
    }

    /// End offset (exclusive) of a `?( ... )` body starting at `self.pos`
    fn selector_end(&self, open: usize) -> Result<usize> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (offset, c) in self.input[self.pos..].char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(self.pos + offset + 1);
                    }
                }
                _ => {}
            }
        }
        Err(PathError::syntax("unterminated selector", open))
    }

    /// End offset (exclusive) of a JSON string starting at `self.pos`
    fn string_end(&self, open: usize) -> Result<usize> {
        let mut escaped = false;
        for (offset, c) in self.input[self.pos..].char_indices().skip(1) {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                return Ok(self.pos + offset + 1);
            }
        }
        Err(PathError::syntax("unterminated quoted key", open))
    }
}

fn parse_index_or_wildcard(content: &str, position: usize) -> Result<Step> {
    if content == "*" {
        return Ok(Step::Wildcard);
    }
    if content.is_empty() {
        return Err(PathError::syntax("empty subscript", position));
    }
    let digits = content.strip_prefix('-').unwrap_or(content);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::syntax(
            format!("invalid subscript '{content}'"),
            position,
        ));
    }
    content
        .parse::<i64>()
        .map(Step::Index)
        .map_err(|_| PathError::syntax(format!("index '{content}' out of range"), position))
}
