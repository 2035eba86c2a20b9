// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conditional selectors
//!
//! A selector body such as `?(@.profile.active==true)` is parsed once, at
//! normalization time, into a [`Predicate`]: a field-access chain rooted at
//! the candidate, a comparator and a literal. Evaluation walks the chain with
//! key semantics and compares; it never fails.

use crate::error::{PathError, Result};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator in a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparator {
    /// Operator text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Literal operand of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any JSON number
    Number(Number),
    /// Quoted string
    String(String),
}

impl Literal {
    fn equals(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Null, Value::Null) => true,
            (Self::Bool(a), Value::Bool(b)) => a == b,
            (Self::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Self::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    fn compare(&self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Number(a), Self::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
            (Value::String(a), Self::String(b)) => Some(a.as_str().cmp(b.as_str())),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{}", Value::String(s.clone())),
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        #[allow(clippy::float_cmp)]
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

const COMPARATOR_START: &str = "=!<>";
const FIELD_STOP: &str = ".[)=!<>";

/// Whether a field name reads back unchanged without quoting
fn is_bare_field(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(char::is_whitespace)
        && !key.ends_with(char::is_whitespace)
        && !key.contains(|c: char| {
            FIELD_STOP.contains(c) || matches!(c, '(' | ']' | '"' | '\'' | '\\')
        })
}

/// A parsed selector predicate over the candidate `@`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field chain below `@`; empty compares the candidate itself
    pub field: Vec<String>,
    /// Comparison operator
    pub op: Comparator,
    /// Right-hand operand
    pub literal: Literal,
}

impl Predicate {
    /// Build a predicate from parts
    #[must_use]
    pub fn new<I, S>(field: I, op: Comparator, literal: Literal) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into_iter().map(Into::into).collect(),
            op,
            literal,
        }
    }

    /// Parse a selector body such as `?(@.a.b=="x")`
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Syntax`] when the body is not a well-formed
    /// selector. Positions are relative to `base`.
    pub fn parse(body: &str, base: usize) -> Result<Self> {
        SelectorParser {
            input: body,
            pos: 0,
            base,
        }
        .parse()
    }

    /// Evaluate the predicate against a candidate
    ///
    /// An absent field anywhere along the chain makes the predicate false,
    /// whatever the comparator.
    #[must_use]
    pub fn matches(&self, candidate: &Value) -> bool {
        let mut current = candidate;
        for key in &self.field {
            match current {
                Value::Object(map) => match map.get(key) {
                    Some(next) => current = next,
                    None => return false,
                },
                _ => return false,
            }
        }

        match self.op {
            Comparator::Eq => self.literal.equals(current),
            Comparator::Ne => !self.literal.equals(current),
            Comparator::Lt => self.literal.compare(current) == Some(Ordering::Less),
            Comparator::Le => matches!(
                self.literal.compare(current),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Comparator::Gt => self.literal.compare(current) == Some(Ordering::Greater),
            Comparator::Ge => matches!(
                self.literal.compare(current),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("?(@")?;
        for key in &self.field {
            if is_bare_field(key) {
                write!(f, ".{key}")?;
            } else {
                write!(f, "[{}]", Value::String(key.clone()))?;
            }
        }
        write!(f, "{}{})", self.op.as_str(), self.literal)
    }
}

/// Evaluate a predicate against a candidate
#[inline]
#[must_use]
pub fn matches(predicate: &Predicate, candidate: &Value) -> bool {
    predicate.matches(candidate)
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
    base: usize,
}

impl SelectorParser<'_> {
    fn error(&self, message: impl Into<String>) -> PathError {
        PathError::syntax(message, self.base + self.pos)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.input[self.pos..].starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, text: &str) -> Result<()> {
        if self.eat(text) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{text}' in selector")))
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse(mut self) -> Result<Predicate> {
        self.expect("?(")?;
        self.skip_ws();
        self.expect("@")?;

        let mut field = Vec::new();
        loop {
            if self.eat(".") {
                field.push(self.field_name()?);
            } else if self.peek() == Some('[') {
                field.push(self.quoted_field()?);
            } else {
                break;
            }
        }

        self.skip_ws();
        let op = self.comparator()?;
        self.skip_ws();
        let literal = self.literal()?;
        self.skip_ws();
        self.expect(")")?;

        if self.pos != self.input.len() {
            return Err(self.error("unexpected trailing characters after selector"));
        }

        Ok(Predicate { field, op, literal })
    }

    /// Bare field: runs to the next `.`, `[` or `)` or to the comparator,
    /// dropping only the whitespace before the comparator
    fn field_name(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if FIELD_STOP.contains(c) {
                break;
            }
            self.bump();
        }
        let name = &self.input[start..self.pos];
        let name = if self.peek().is_some_and(|c| COMPARATOR_START.contains(c)) {
            name.trim_end()
        } else {
            name
        };
        if name.is_empty() {
            return Err(self.error("empty field name in selector"));
        }
        Ok(name.to_string())
    }

    /// `["..."]` field holding any key, JSON string escapes
    fn quoted_field(&mut self) -> Result<String> {
        let open = self.pos;
        self.bump();
        if self.peek() != Some('"') {
            return Err(self.error("expected a quoted field name after '['"));
        }
        let Literal::String(name) = self.double_quoted()? else {
            return Err(PathError::syntax("expected a quoted field name", self.base + open));
        };
        self.expect("]")?;
        Ok(name)
    }

    fn comparator(&mut self) -> Result<Comparator> {
        for (text, op) in [
            ("==", Comparator::Eq),
            ("!=", Comparator::Ne),
            ("<=", Comparator::Le),
            (">=", Comparator::Ge),
            ("<", Comparator::Lt),
            (">", Comparator::Gt),
        ] {
            if self.eat(text) {
                return Ok(op);
            }
        }
        Err(self.error("unknown or missing comparator in selector"))
    }

    fn literal(&mut self) -> Result<Literal> {
        match self.peek() {
            Some('"') => self.double_quoted(),
            Some('\'') => self.single_quoted(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(_) => {
                for (text, literal) in [
                    ("true", Literal::Bool(true)),
                    ("false", Literal::Bool(false)),
                    ("null", Literal::Null),
                ] {
                    if self.eat(text) {
                        return Ok(literal);
                    }
                }
                Err(self.error("expected a literal (string, number, true, false or null)"))
            }
            None => Err(self.error("missing literal in selector")),
        }
    }

    fn double_quoted(&mut self) -> Result<Literal> {
        let start = self.pos;
        self.bump();
        let mut escaped = false;
        while let Some(c) = self.bump() {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => {
                    let raw = &self.input[start..self.pos];
                    return serde_json::from_str::<String>(raw)
                        .map(Literal::String)
                        .map_err(|e| PathError::syntax(e.to_string(), self.base + start));
                }
                _ => escaped = false,
            }
        }
        Err(PathError::syntax(
            "unterminated string in selector",
            self.base + start,
        ))
    }

    fn single_quoted(&mut self) -> Result<Literal> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\\' => match self.bump() {
                    Some(next) => out.push(next),
                    None => break,
                },
                '\'' => return Ok(Literal::String(out)),
                other => out.push(other),
            }
        }
        Err(PathError::syntax(
            "unterminated string in selector",
            self.base + start,
        ))
    }

    fn number(&mut self) -> Result<Literal> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || "+-.eE".contains(c))
        {
            self.bump();
        }
        let raw = &self.input[start..self.pos];
        raw.parse::<Number>()
            .map(Literal::Number)
            .map_err(|_| PathError::syntax(format!("invalid number '{raw}'"), self.base + start))
    }
}
