//! Spline interpolation for position-indexed samples.
//!
//! [`Interpolator`] stores sorted samples of a scalar, [`AccPair`] or
//! [`AccTriple`] value and evaluates them through one spline kernel per
//! component. It has an explicit lifecycle: the spline is built by
//! [`Interpolator::init`] (or lazily on the first mutable
//! [`Interpolator::interp`]) and discarded whenever the samples change.
//!
//! Periodic kinds wrap around a configurable period and never extrapolate;
//! evaluating outside the interpolation range is always an error.
//!
//! [`AccPair`]: accring_core::AccPair
//! [`AccTriple`]: accring_core::AccTriple

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interpolator;
pub mod spline;

pub use error::InterpError;
pub use interpolator::{Interpolator, SplineSet};
pub use spline::SplineKind;
