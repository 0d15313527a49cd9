//! Benchmark profiles for the accring lattice toolkit.
//!
//! - [`reference_ring`]: a 1 km ring of 100 FODO cells with correctors
//! - [`betatron_orbit`]: a multi-turn orbit oscillating with a given tune

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use accring_core::{AccPair, AccTriple};
use accring_fop::FunctionOfPos;
use accring_interp::SplineKind;
use accring_lattice::{Anchor, Element, ElementKind, Family, Lattice, Plane};
use std::f64::consts::TAU;

/// Cells in [`reference_ring`].
pub const REFERENCE_CELLS: usize = 100;

/// Length of one cell in [`reference_ring`], m.
pub const CELL_LENGTH: f64 = 10.0;

/// Build the reference ring: 100 cells of 10 m, each with two
/// quadrupoles, two dipoles and a corrector, keyed at element begin.
///
/// The 2π total bend is spread evenly over all dipoles.
pub fn reference_ring() -> Lattice {
    let c = CELL_LENGTH * REFERENCE_CELLS as f64;
    let mut ring = Lattice::new(c, Anchor::Begin).unwrap();
    let dipole_length = 3.0;
    let k0 = TAU / (2.0 * REFERENCE_CELLS as f64 * dipole_length);
    for i in 0..REFERENCE_CELLS {
        let s0 = CELL_LENGTH * i as f64;
        let items = [
            (0.5, ElementKind::Quadrupole, "QF", 0.5, Family::F),
            (1.5, ElementKind::Dipole, "MA", dipole_length, Family::None),
            (5.0, ElementKind::Quadrupole, "QD", 0.5, Family::D),
            (6.0, ElementKind::Dipole, "MB", dipole_length, Family::None),
            (9.5, ElementKind::Corrector, "HC", 0.2, Family::None),
        ];
        for (offset, kind, name, length, family) in items {
            let mut e = Element::new(kind, format!("{name}{i}"), length)
                .unwrap()
                .with_family(family);
            match kind {
                ElementKind::Quadrupole => e.k1 = 0.3,
                ElementKind::Dipole => e.k0 = AccTriple::new(0.0, k0, 0.0),
                _ => {
                    e.plane = Plane::H;
                    e.k0 = AccTriple::new(1e-4, 0.0, 0.0);
                }
            }
            ring.mount(s0 + offset, e).unwrap();
        }
    }
    ring
}

/// Orbit `x = amp · cos(2π · tune · s / C)` over `n_turns`, sampled
/// `samples_per_turn` times per turn.
pub fn betatron_orbit(
    circumference: f64,
    tune: f64,
    amp: f64,
    samples_per_turn: usize,
    n_turns: u32,
) -> FunctionOfPos<AccPair> {
    let mut orbit =
        FunctionOfPos::with_grid(circumference, SplineKind::CsplinePeriodic, samples_per_turn, n_turns)
            .unwrap();
    for index in 0..orbit.len() {
        let s = orbit.position(index).unwrap();
        let x = amp * (TAU * tune * s / circumference).cos();
        orbit.modify_at(index, AccPair::new(x, 0.0)).unwrap();
    }
    orbit
}
