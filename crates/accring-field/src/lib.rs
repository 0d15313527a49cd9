//! Field sampling along a ring and its harmonic analysis.
//!
//! [`Field`] walks equidistant positions of every orbit turn and stores the
//! lattice field as a function of position. [`Spectrum`] transforms any
//! scalar projection of such a function with a real-input FFT and keeps
//! amplitude and phase per revolution harmonic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod spectrum;

pub use error::{FieldError, SpectrumError};
pub use field::Field;
pub use spectrum::{Harmonic, Spectrum, SpectrumConfig};
