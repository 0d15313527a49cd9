//! Error types for elements and lattices.

use crate::element::ElementKind;
use accring_core::TableError;
use std::error::Error;
use std::fmt;

/// Errors from constructing or mutating a single [`Element`](crate::Element).
#[derive(Clone, Debug, PartialEq)]
pub enum ElementError {
    /// Length is negative or not finite.
    InvalidLength {
        /// The rejected length.
        length: f64,
    },
    /// A physical length is negative or not finite.
    InvalidPhysLength {
        /// The rejected length.
        length: f64,
    },
    /// Attribute assignment between elements of different kind or length.
    AssignMismatch {
        /// Kind and length of the target.
        target: (ElementKind, f64),
        /// Kind and length of the source.
        source: (ElementKind, f64),
    },
    /// The operation is not defined for this kind of element.
    InvalidOperation {
        /// Element kind.
        kind: ElementKind,
        /// The rejected operation.
        operation: &'static str,
    },
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { length } => write!(f, "invalid element length {length}"),
            Self::InvalidPhysLength { length } => {
                write!(f, "invalid physical length {length}")
            }
            Self::AssignMismatch { target, source } => write!(
                f,
                "cannot assign {} (L={}) to {} (L={})",
                source.0, source.1, target.0, target.1
            ),
            Self::InvalidOperation { kind, operation } => {
                write!(f, "{operation} is not defined for {kind}")
            }
        }
    }
}

impl Error for ElementError {}

/// Errors from [`LatticeConfig::validate`](crate::LatticeConfig::validate).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Fringe offset is negative or not finite.
    InvalidFringeOffset {
        /// The rejected value.
        value: f64,
    },
    /// Length tolerance is not positive and finite.
    InvalidTolerance {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFringeOffset { value } => {
                write!(f, "fringe offset must be >= 0 and finite, got {value}")
            }
            Self::InvalidTolerance { value } => {
                write!(f, "length tolerance must be > 0 and finite, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors from [`Lattice`](crate::Lattice) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum LatticeError {
    /// Circumference is not positive and finite.
    InvalidCircumference {
        /// The rejected value.
        value: f64,
    },
    /// A position is negative.
    NegativePosition {
        /// The rejected position.
        pos: f64,
    },
    /// A position lies beyond the circumference, or is not finite.
    OutOfRange {
        /// The rejected position.
        pos: f64,
        /// Ring circumference.
        circumference: f64,
    },
    /// A mount would overlap a neighbour or cross the ring boundary.
    NoFreeSpace {
        /// Name of the element being mounted.
        candidate: String,
        /// Candidate footprint begin.
        begin: f64,
        /// Candidate footprint end.
        end: f64,
        /// Names of the colliding neighbours; ring boundaries appear as
        /// `"<ring begin>"` / `"<ring end>"`.
        colliding: Vec<String>,
    },
    /// A filtered search reached the end of the lattice.
    NoMatchingElement {
        /// Searched kind.
        kind: ElementKind,
    },
    /// Dereferenced a cursor at the end of the lattice.
    EndOfLattice,
    /// Element error.
    Element(ElementError),
    /// Configuration error.
    Config(ConfigError),
    /// Reading an input table failed.
    Table(TableError),
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCircumference { value } => {
                write!(f, "circumference must be positive and finite, got {value}")
            }
            Self::NegativePosition { pos } => write!(f, "negative position {pos}"),
            Self::OutOfRange { pos, circumference } => {
                write!(f, "position {pos} outside ring [0, {circumference}]")
            }
            Self::NoFreeSpace {
                candidate,
                begin,
                end,
                colliding,
            } => write!(
                f,
                "no free space for {candidate} at [{begin}, {end}]: collides with {}",
                colliding.join(", ")
            ),
            Self::NoMatchingElement { kind } => {
                write!(f, "no further {kind} in lattice")
            }
            Self::EndOfLattice => write!(f, "cursor is at the end of the lattice"),
            Self::Element(e) => write!(f, "element: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Table(e) => write!(f, "table: {e}"),
        }
    }
}

impl Error for LatticeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Element(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ElementError> for LatticeError {
    fn from(e: ElementError) -> Self {
        Self::Element(e)
    }
}

impl From<ConfigError> for LatticeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TableError> for LatticeError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}
