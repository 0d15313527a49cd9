//! Error types for field sampling and spectra.

use accring_fop::FopError;
use accring_lattice::LatticeError;
use std::error::Error;
use std::fmt;

/// Errors from [`Field`](crate::Field) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// At least one sample per turn is needed.
    NoSamples,
    /// The orbit holds no data.
    EmptyOrbit,
    /// Lattice and orbit live on rings of different size.
    CircumferenceMismatch {
        /// Lattice circumference.
        lattice: f64,
        /// Orbit circumference.
        orbit: f64,
    },
    /// Storing or interpolating samples failed.
    Fop(FopError),
    /// A lattice lookup failed.
    Lattice(LatticeError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSamples => write!(f, "at least one sample per turn is required"),
            Self::EmptyOrbit => write!(f, "orbit has no samples"),
            Self::CircumferenceMismatch { lattice, orbit } => write!(
                f,
                "lattice circumference {lattice} differs from orbit circumference {orbit}"
            ),
            Self::Fop(e) => write!(f, "function of position: {e}"),
            Self::Lattice(e) => write!(f, "lattice: {e}"),
        }
    }
}

impl Error for FieldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fop(e) => Some(e),
            Self::Lattice(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FopError> for FieldError {
    fn from(e: FopError) -> Self {
        Self::Fop(e)
    }
}

impl From<LatticeError> for FieldError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}

/// Errors from [`Spectrum`](crate::Spectrum) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum SpectrumError {
    /// The amplitude cut is negative or not finite.
    InvalidAmpCut {
        /// The rejected value.
        value: f64,
    },
    /// Fewer than two samples to transform.
    TooFewSamples {
        /// Number of samples found.
        found: usize,
    },
    /// Irregular samples of a non-periodic kind do not span the
    /// equidistant grid they would be resampled on.
    SamplesDoNotCover {
        /// First sample position.
        first: f64,
        /// Last sample position.
        last: f64,
        /// Last grid position that must be reached.
        needed: f64,
    },
    /// An amplitude cut may only be raised.
    CutLoosened {
        /// The cut in force.
        current: f64,
        /// The lower cut that was requested.
        requested: f64,
    },
    /// Resampling the input failed.
    Fop(FopError),
    /// Writing output failed.
    Io {
        /// Description of the I/O failure.
        reason: String,
    },
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmpCut { value } => {
                write!(f, "amplitude cut must be non-negative and finite, got {value}")
            }
            Self::TooFewSamples { found } => {
                write!(f, "spectrum needs at least 2 samples, found {found}")
            }
            Self::SamplesDoNotCover {
                first,
                last,
                needed,
            } => write!(
                f,
                "samples span [{first}, {last}] but resampling needs [0, {needed}]; \
                 use a periodic spline kind or sample the whole window"
            ),
            Self::CutLoosened { current, requested } => write!(
                f,
                "amplitude cut can only be tightened: {requested} < {current}; \
                 build a new spectrum instead"
            ),
            Self::Fop(e) => write!(f, "function of position: {e}"),
            Self::Io { reason } => write!(f, "I/O error: {reason}"),
        }
    }
}

impl Error for SpectrumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fop(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FopError> for SpectrumError {
    fn from(e: FopError) -> Self {
        Self::Fop(e)
    }
}

impl From<std::io::Error> for SpectrumError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            reason: e.to_string(),
        }
    }
}
