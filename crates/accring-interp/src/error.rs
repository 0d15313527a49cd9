//! Error types for interpolation.

use crate::spline::SplineKind;
use std::error::Error;
use std::fmt;

/// Errors from building or evaluating a spline.
#[derive(Clone, Debug, PartialEq)]
pub enum InterpError {
    /// Not enough samples for the selected spline kind.
    TooFewPoints {
        /// The spline kind.
        kind: SplineKind,
        /// Samples present.
        found: usize,
        /// Minimum required.
        needed: usize,
    },
    /// Evaluation requested outside `[min, max]`.
    OutOfRange {
        /// Requested position.
        x: f64,
        /// Lower bound of the interpolation range.
        min: f64,
        /// Upper bound of the interpolation range.
        max: f64,
    },
    /// Read-only evaluation on an engine whose spline has not been built.
    NotInitialized,
    /// The period is not positive, or shorter than the sampled span.
    InvalidPeriod {
        /// Configured period.
        period: f64,
        /// Span covered by the samples.
        span: f64,
    },
    /// The spline library rejected the samples.
    Kernel {
        /// The spline kind.
        kind: SplineKind,
        /// Message from the library.
        reason: String,
    },
    /// A sample position or request is NaN or infinite.
    NonFinite {
        /// The offending value.
        x: f64,
    },
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints {
                kind,
                found,
                needed,
            } => write!(f, "{kind} interpolation needs {needed} samples, found {found}"),
            Self::OutOfRange { x, min, max } => {
                write!(f, "position {x} outside interpolation range [{min}, {max}]")
            }
            Self::NotInitialized => write!(f, "interpolation not initialized"),
            Self::InvalidPeriod { period, span } => {
                write!(f, "invalid period {period} for data spanning {span}")
            }
            Self::Kernel { kind, reason } => write!(f, "{kind} spline build failed: {reason}"),
            Self::NonFinite { x } => write!(f, "non-finite position {x}"),
        }
    }
}

impl Error for InterpError {}
