//! accring: circular accelerator lattices and functions of ring position.
//!
//! This is the top-level facade crate that re-exports the public API of all
//! accring sub-crates. For most users, adding `accring` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use accring::prelude::*;
//!
//! let mut ring = Lattice::new(30.0, Anchor::Begin).unwrap();
//! let dipole = Element::new(ElementKind::Dipole, "M1", 2.5)
//!     .unwrap()
//!     .with_k0(AccTriple::new(0.0, 0.05, 0.0));
//! ring.mount(2.0, dipole).unwrap();
//! ring.mount(5.0, Element::new(ElementKind::Quadrupole, "Q1", 0.5).unwrap())
//!     .unwrap();
//!
//! let mut field = Field::new(ring.circumference(), SplineKind::Linear).unwrap();
//! field.set_design(&ring, 300, false).unwrap();
//! let bz = field.function().component(1).unwrap();
//! let spectrum = Spectrum::new(&bz, SpectrumConfig::default()).unwrap();
//! assert!((spectrum.harmonics()[0].amp - 0.05 * 2.5 / 30.0).abs() < 1e-3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `accring-core` | Value types, tables, metadata, constants, external tools |
//! | [`interp`] | `accring-interp` | Spline kernels and the interpolation engine |
//! | [`fop`] | `accring-fop` | Turn-aware functions of position |
//! | [`lattice`] | `accring-lattice` | Elements, the ring lattice, cursors, import and export |
//! | [`field`] | `accring-field` | Field sampling and harmonic spectra |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Value types, tables and metadata (`accring-core`).
pub use accring_core as types;

/// Spline interpolation (`accring-interp`).
///
/// [`interp::Interpolator`] is the engine behind every function of
/// position.
pub use accring_interp as interp;

/// Functions of ring position and turn (`accring-fop`).
pub use accring_fop as fop;

/// Elements and lattices (`accring-lattice`).
///
/// Also holds table import, misalignments, text export and resonance
/// strengths.
pub use accring_lattice as lattice;

/// Field sampling and spectra (`accring-field`).
pub use accring_field as field;

/// Common imports for typical accring usage.
///
/// ```rust
/// use accring::prelude::*;
/// ```
pub mod prelude {
    // Values and tables
    pub use accring_core::{AccPair, AccTriple, ColumnSource, Components, Metadata, Table};

    // Interpolation
    pub use accring_interp::{Interpolator, SplineKind};

    // Functions of position
    pub use accring_fop::{FunctionOfPos, TableLayout};

    // Lattice
    pub use accring_lattice::{
        Anchor, Cursor, Dialect, Element, ElementKind, Family, Filter, ImportLayout, Lattice,
        LatticeConfig, Plane, TypedCursor,
    };

    // Field
    pub use accring_field::{Field, Spectrum, SpectrumConfig};

    // Errors
    pub use accring_core::{TableError, ToolError};
    pub use accring_field::{FieldError, SpectrumError};
    pub use accring_fop::FopError;
    pub use accring_interp::InterpError;
    pub use accring_lattice::{ElementError, LatticeError};
}
