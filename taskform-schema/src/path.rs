//! Field paths addressing values inside a nested form.
//!
//! A path like `tasks[0].content` names one value in the submitted form:
//! the `content` field of the first entry of the `tasks` list. Paths key
//! the validation error maps and double as the `name` attributes of the
//! rendered inputs, so parsing and display must agree exactly.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// A named field, e.g. `title` or `content`.
    Key(String),
    /// A position inside a list field, e.g. the `0` in `tasks[0]`.
    Index(usize),
}

/// Dotted/bracketed address of a value within a nested form.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

/// Errors from parsing a field path string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    /// The input was empty.
    #[error("empty field path")]
    Empty,
    /// A dotted segment had no name.
    #[error("empty segment at byte {0}")]
    EmptySegment(usize),
    /// An index was unclosed or not a number.
    #[error("malformed index at byte {0}")]
    MalformedIndex(usize),
    /// A character appeared where it is not allowed.
    #[error("unexpected character {1:?} at byte {0}")]
    UnexpectedChar(usize, char),
}

impl FieldPath {
    /// Starts a path at a top-level field name.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Key(name.into())],
        }
    }

    /// Extends the path with a list index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Extends the path with a named field.
    #[must_use]
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(name.into()));
        self
    }

    /// The path's segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parses a path from its string form.
    ///
    /// The grammar is `key ( '[' digits ']' | '.' key )*`: a path starts
    /// with a field name, and every later segment is either a bracketed
    /// index or a dotted name.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] describing the first offending byte.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        let mut chars = input.char_indices().peekable();
        let mut expect_key = true;

        while let Some(&(pos, c)) = chars.peek() {
            if expect_key {
                let mut name = String::new();
                while let Some(&(key_pos, k)) = chars.peek() {
                    if k == '.' || k == '[' {
                        break;
                    }
                    if k == ']' {
                        return Err(PathError::UnexpectedChar(key_pos, ']'));
                    }
                    name.push(k);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(PathError::EmptySegment(pos));
                }
                segments.push(Segment::Key(name));
                expect_key = false;
            } else {
                match c {
                    '.' => {
                        chars.next();
                        if chars.peek().is_none() {
                            return Err(PathError::EmptySegment(pos + 1));
                        }
                        expect_key = true;
                    }
                    '[' => {
                        chars.next();
                        let mut digits = String::new();
                        while let Some(&(_, d)) = chars.peek() {
                            if d == ']' {
                                break;
                            }
                            digits.push(d);
                            chars.next();
                        }
                        // Consume the closing bracket.
                        if chars.next().is_none() {
                            return Err(PathError::MalformedIndex(pos));
                        }
                        let index = digits
                            .parse()
                            .map_err(|_| PathError::MalformedIndex(pos))?;
                        segments.push(Segment::Index(index));
                    }
                    other => return Err(PathError::UnexpectedChar(pos, other)),
                }
            }
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Paths serialize as their string form so they can key JSON maps.

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathVisitor;

        impl Visitor<'_> for PathVisitor {
            type Value = FieldPath;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a field path string like `tasks[0].content`")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldPath, E> {
                FieldPath::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(PathVisitor)
    }
}
