//! Test fixtures and seeded generators for accring development.
//!
//! [`fixtures`] holds small hand-built lattices and functions with known
//! answers; [`random`] builds reproducible random lattices from a seed.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod random;

pub use fixtures::{fodo_ring, sampled_fop, two_magnet_ring, FodoCell};
pub use random::RandomLattice;
