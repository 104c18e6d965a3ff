//! Terms - the loosely-typed arguments the reasoning layer sends with actions.
//!
//! Terms are parsed from the reasoning layer's literal syntax:
//! `name(arg, ...)` where each argument is an integer, an atom
//! (`lowercase_ident`), a double-quoted string or a list `[...]`.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

/// A single action argument or percept value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    Int(i64),
    Atom(String),
    Str(String),
    List(Vec<Term>),
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Term::Str(value.into())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Term::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// Atom or string contents, for name-like arguments.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Term::Atom(s) | Term::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items),
            _ => None,
        }
    }

    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Int(_) => "integer",
            Term::Atom(_) => "atom",
            Term::Str(_) => "string",
            Term::List(_) => "list",
        }
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::Int(n)
    }
}

impl From<i32> for Term {
    fn from(n: i32) -> Self {
        Term::Int(i64::from(n))
    }
}

impl From<Vec<Term>> for Term {
    fn from(items: Vec<Term>) -> Self {
        Term::List(items)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Int(n) => write!(f, "{}", n),
            Term::Atom(a) => write!(f, "{}", a),
            Term::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Term::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// A parsed `name(args...)` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCall {
    pub name: String,
    pub args: Vec<Term>,
}

impl ActionCall {
    pub fn new(name: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for ActionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            write_joined(f, &self.args)?;
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl FromStr for ActionCall {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(input);
        let call = parser.call()?;
        parser.finish()?;
        Ok(call)
    }
}

impl FromStr for Term {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(input);
        let term = parser.term()?;
        parser.finish()?;
        Ok(term)
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |(idx, _)| *idx)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.peek().map(|(_, c)| *c)
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        let next = self.peek();
        let offset = self.offset();
        match next {
            Some(c) if c == expected => {
                self.chars.next();
                Ok(())
            }
            Some(c) => Err(ParseError::new(offset, format!("expected '{}', found '{}'", expected, c))),
            None => Err(ParseError::new(offset, format!("expected '{}', found end of input", expected))),
        }
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(ParseError::new(self.offset(), format!("unexpected trailing '{}'", c))),
        }
    }

    fn call(&mut self) -> Result<ActionCall, ParseError> {
        let name = self.identifier()?;
        let args = if self.peek() == Some('(') {
            self.sequence('(', ')')?
        } else {
            Vec::new()
        };
        Ok(ActionCall { name, args })
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Vec<Term>, ParseError> {
        self.expect(open)?;
        let mut items = Vec::new();
        if self.peek() == Some(close) {
            self.chars.next();
            return Ok(items);
        }
        loop {
            items.push(self.term()?);
            match self.peek() {
                Some(',') => {
                    self.chars.next();
                }
                Some(c) if c == close => {
                    self.chars.next();
                    return Ok(items);
                }
                Some(c) => {
                    return Err(ParseError::new(
                        self.offset(),
                        format!("expected ',' or '{}', found '{}'", close, c),
                    ))
                }
                None => {
                    return Err(ParseError::new(
                        self.offset(),
                        format!("unterminated sequence, expected '{}'", close),
                    ))
                }
            }
        }
    }

    fn term(&mut self) -> Result<Term, ParseError> {
        let next = self.peek();
        let offset = self.offset();
        match next {
            Some('[') => Ok(Term::List(self.sequence('[', ']')?)),
            Some('"') => self.string().map(Term::Str),
            Some(c) if c == '-' || c.is_ascii_digit() => self.integer(),
            Some(c) if c.is_ascii_lowercase() => self.identifier().map(Term::Atom),
            Some(c) if c.is_ascii_uppercase() || c == '_' => {
                Err(ParseError::new(offset, "unbound variables are not allowed in actions"))
            }
            Some(c) => Err(ParseError::new(offset, format!("unexpected '{}'", c))),
            None => Err(ParseError::new(offset, "expected a term, found end of input")),
        }
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        let next = self.peek();
        let start = self.offset();
        match next {
            Some(c) if c.is_ascii_lowercase() => {}
            _ => return Err(ParseError::new(start, "expected an identifier")),
        }
        let mut ident = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_alphanumeric() || *c == '_') {
            ident.push(c);
        }
        Ok(ident)
    }

    fn integer(&mut self) -> Result<Term, ParseError> {
        let start = self.offset();
        let mut digits = String::new();
        if let Some((_, c)) = self.chars.next_if(|(_, c)| *c == '-') {
            digits.push(c);
        }
        while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_digit()) {
            digits.push(c);
        }
        digits
            .parse::<i64>()
            .map(Term::Int)
            .map_err(|e| ParseError::new(start, format!("invalid integer '{}': {}", digits, e)))
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let start = self.offset();
        self.expect('"')?;
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(value),
                Some((idx, '\\')) => match self.chars.next() {
                    Some((_, c @ ('"' | '\\'))) => value.push(c),
                    Some((_, 'n')) => value.push('\n'),
                    _ => return Err(ParseError::new(idx, "invalid escape sequence")),
                },
                Some((_, c)) => value.push(c),
                None => return Err(ParseError::new(start, "unterminated string")),
            }
        }
    }
}
