//! Label/value header blocks for ASCII output.

use indexmap::IndexMap;
use std::io::{self, Write};

/// Ordered label/value pairs written ahead of tabular dumps.
///
/// Each entry becomes one line `<delimiter> <label, padded> <value>`.
/// Re-adding a label replaces its value but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    entries: IndexMap<String, String>,
}

impl Metadata {
    /// Default line prefix.
    pub const DELIMITER: &'static str = "#";

    /// Create an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn add(&mut self, label: impl Into<String>, value: impl ToString) {
        self.entries.insert(label.into(), value.to_string());
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.add(label, value);
        self
    }

    /// Value for a label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append all entries of `other`, replacing duplicates.
    pub fn merge(&mut self, other: &Metadata) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Write the header block with the given line prefix.
    pub fn write_header<W: Write>(&self, w: &mut W, delimiter: &str) -> io::Result<()> {
        let width = self.entries.keys().map(String::len).max().unwrap_or(0) + 2;
        for (label, value) in &self.entries {
            writeln!(w, "{delimiter} {label:<width$}{value}")?;
        }
        Ok(())
    }
}
