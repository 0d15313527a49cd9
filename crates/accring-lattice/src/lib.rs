//! Accelerator elements and the ring lattice that holds them.
//!
//! An [`Element`] is one flat struct tagged with an [`ElementKind`]; its
//! kind and length are fixed, everything else is a public attribute. A
//! [`Lattice`] owns its elements in position order, keyed by one
//! [`Anchor`] of each footprint, and refuses overlapping placements.
//!
//! Navigation goes through [`Cursor`] and [`TypedCursor`], which borrow
//! the lattice immutably, or through plain iterators. Field lookups,
//! synchrotron-radiation summaries, table import, text export and
//! resonance strengths are built on top of that storage.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod anchor;
pub mod config;
pub mod cursor;
pub mod edge;
pub mod element;
pub mod error;
pub mod export;
pub mod import;
pub mod lattice;
pub mod queries;
pub mod resonance;

pub use anchor::{locate, Anchor};
pub use config::LatticeConfig;
pub use cursor::{Cursor, Filter, TypedCursor};
pub use element::{Element, ElementKind, Family, Plane};
pub use error::{ConfigError, ElementError, LatticeError};
pub use export::Dialect;
pub use import::{ImportLayout, Misalignment, MisalignmentLayout, MisalignmentReport};
pub use lattice::Lattice;
pub use queries::PhotonStats;
pub use resonance::ResonanceStrengths;
