//! Position- and turn-indexed samples along a closed ring.
//!
//! [`FunctionOfPos`] stores values of a scalar, [`AccPair`] or
//! [`AccTriple`] shape keyed by absolute position
//! `pos_in_turn + (turn - 1) * circumference`, and answers arbitrary
//! positions by spline interpolation through [`accring_interp`].
//!
//! [`AccPair`]: accring_core::AccPair
//! [`AccTriple`]: accring_core::AccTriple

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fop;
pub mod io;

pub use error::FopError;
pub use fop::FunctionOfPos;
pub use io::TableLayout;
