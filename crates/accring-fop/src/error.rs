//! Error types for position functions.

use accring_core::TableError;
use accring_interp::InterpError;
use std::error::Error;
use std::fmt;

/// Errors from [`FunctionOfPos`](crate::FunctionOfPos) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum FopError {
    /// Circumference is not a positive finite number.
    InvalidCircumference {
        /// The rejected value.
        value: f64,
    },
    /// A position is negative.
    NegativePosition {
        /// The rejected position.
        pos: f64,
    },
    /// A position is NaN or infinite.
    NonFinitePosition {
        /// The rejected position.
        pos: f64,
    },
    /// Turn numbers start at 1.
    InvalidTurn {
        /// The rejected turn.
        turn: u32,
    },
    /// No sample is stored at the requested position.
    NoData {
        /// Position within the turn.
        pos: f64,
        /// Turn number.
        turn: u32,
    },
    /// A sample index is past the end of the stored data.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of stored samples.
        len: usize,
    },
    /// The operands of an arithmetic combination are not compatible.
    Incompatible {
        /// Left-hand circumference.
        lhs_circumference: f64,
        /// Right-hand circumference.
        rhs_circumference: f64,
        /// Left-hand turn count.
        lhs_turns: u32,
        /// Right-hand turn count.
        rhs_turns: u32,
    },
    /// Interpolation failed.
    Interp(InterpError),
    /// Reading the input table failed.
    Table(TableError),
    /// Writing output failed.
    Io {
        /// Description of the I/O failure.
        reason: String,
    },
}

impl fmt::Display for FopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCircumference { value } => {
                write!(f, "circumference must be positive and finite, got {value}")
            }
            Self::NegativePosition { pos } => write!(f, "negative position {pos}"),
            Self::NonFinitePosition { pos } => write!(f, "non-finite position {pos}"),
            Self::InvalidTurn { turn } => write!(f, "turn {turn} is invalid, turns start at 1"),
            Self::NoData { pos, turn } => write!(f, "no data at position {pos} in turn {turn}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "sample index {index} out of range for {len} samples")
            }
            Self::Incompatible {
                lhs_circumference,
                rhs_circumference,
                lhs_turns,
                rhs_turns,
            } => write!(
                f,
                "incompatible functions: circumference {lhs_circumference} / {rhs_circumference}, \
                 turns {lhs_turns} / {rhs_turns}"
            ),
            Self::Interp(e) => write!(f, "interpolation: {e}"),
            Self::Table(e) => write!(f, "table: {e}"),
            Self::Io { reason } => write!(f, "I/O error: {reason}"),
        }
    }
}

impl Error for FopError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Interp(e) => Some(e),
            Self::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InterpError> for FopError {
    fn from(e: InterpError) -> Self {
        Self::Interp(e)
    }
}

impl From<TableError> for FopError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

impl From<std::io::Error> for FopError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            reason: e.to_string(),
        }
    }
}
