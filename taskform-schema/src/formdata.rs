//! Flat form data as submitted over the HTTP boundary.
//!
//! Browsers post forms as an ordered list of `name=value` pairs in
//! `application/x-www-form-urlencoded` encoding. [`FormData`] preserves
//! exactly that shape: an ordered multimap the schema walks to build
//! typed values.

use url::form_urlencoded;

/// Ordered key/value pairs from a urlencoded form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Creates empty form data.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parses an `application/x-www-form-urlencoded` body.
    ///
    /// Never fails: malformed percent-escapes decode lossily, matching
    /// what browsers send and servers accept.
    #[must_use]
    pub fn parse_urlencoded(body: &[u8]) -> Self {
        let pairs = form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Constructs form data from existing pairs, preserving their order.
    #[must_use]
    pub const fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Appends a `name=value` pair at the end.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Returns the first value submitted under `name`, if any.
    ///
    /// Duplicate names keep submission order; the first occurrence wins
    /// for single-valued fields.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if any pair was submitted under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Returns true if any submitted name starts with `prefix`.
    ///
    /// Used to discover list entries: entry `i` exists while any name
    /// under the `tasks[i].` prefix was submitted.
    #[must_use]
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k.starts_with(prefix))
    }

    /// All pairs in submission order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Serializes back to `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn to_urlencoded(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }

    /// Number of submitted pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no pairs were submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
