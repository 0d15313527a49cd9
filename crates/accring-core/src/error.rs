//! Error types for table input and external tool execution.

use std::error::Error;
use std::fmt;

/// Errors from reading tabular input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    /// A requested column is not present.
    MissingColumn {
        /// The column name that was asked for.
        name: String,
    },
    /// A vector-valued read named fewer columns than the value has components.
    InsufficientColumns {
        /// Components required by the value type.
        needed: usize,
        /// Column names supplied.
        given: usize,
    },
    /// A cell could not be parsed as a number.
    Parse {
        /// Zero-based data row.
        row: usize,
        /// Column name.
        column: String,
        /// The raw text.
        value: String,
    },
    /// A data row has a different number of fields than the header.
    RaggedRow {
        /// Zero-based data row.
        row: usize,
        /// Header width.
        expected: usize,
        /// Fields found.
        found: usize,
    },
    /// The input has no header row.
    NoHeader,
    /// Reading or writing the underlying stream failed.
    Io {
        /// Description of the I/O failure.
        reason: String,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { name } => write!(f, "column '{name}' not found"),
            Self::InsufficientColumns { needed, given } => {
                write!(f, "value needs {needed} columns, {given} given")
            }
            Self::Parse { row, column, value } => {
                write!(f, "row {row}, column '{column}': cannot parse '{value}'")
            }
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} fields, header has {expected}"),
            Self::NoHeader => write!(f, "table has no header row"),
            Self::Io { reason } => write!(f, "i/o: {reason}"),
        }
    }
}

impl Error for TableError {}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            reason: e.to_string(),
        }
    }
}

/// Errors from running an external simulation program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolError {
    /// The process could not be started.
    Spawn {
        /// Program that was invoked.
        program: String,
        /// OS-level reason.
        reason: String,
    },
    /// The process ran but exited unsuccessfully.
    Failed {
        /// Program that was invoked.
        program: String,
        /// Exit code, `None` if terminated by a signal.
        code: Option<i32>,
    },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, reason } => {
                write!(f, "cannot start '{program}': {reason}")
            }
            Self::Failed { program, code } => match code {
                Some(c) => write!(f, "'{program}' exited with status {c}"),
                None => write!(f, "'{program}' terminated by signal"),
            },
        }
    }
}

impl Error for ToolError {}
