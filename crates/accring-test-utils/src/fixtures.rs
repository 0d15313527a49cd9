//! Hand-built lattices and sampled functions.
//!
//! - [`two_magnet_ring`]: a 30 m ring with one dipole and one quadrupole.
//! - [`fodo_ring`]: a ring of identical FODO cells.
//! - [`sampled_fop`]: a scalar function of position sampled from a closure.

use accring_core::AccTriple;
use accring_fop::FunctionOfPos;
use accring_interp::SplineKind;
use accring_lattice::{Anchor, Element, ElementKind, Family, Lattice, Plane};

/// 30 m ring, keys at element begin: dipole "M1" (2.5 m) at 2.0 and
/// quadrupole "Q1" (0.5 m) at 5.0.
pub fn two_magnet_ring() -> Lattice {
    let mut l = Lattice::new(30.0, Anchor::Begin).expect("valid circumference");
    l.mount(
        2.0,
        Element::new(ElementKind::Dipole, "M1", 2.5).expect("valid length"),
    )
    .expect("free space");
    l.mount(
        5.0,
        Element::new(ElementKind::Quadrupole, "Q1", 0.5).expect("valid length"),
    )
    .expect("free space");
    l
}

/// Geometry and strengths of one FODO cell.
#[derive(Clone, Copy, Debug)]
pub struct FodoCell {
    pub length: f64,
    pub quad_length: f64,
    pub dipole_length: f64,
    pub k1: f64,
    pub bend_radius: f64,
}

impl Default for FodoCell {
    fn default() -> Self {
        Self {
            length: 10.0,
            quad_length: 0.5,
            dipole_length: 3.0,
            k1: 0.4,
            bend_radius: 20.0,
        }
    }
}

/// `cells` identical cells of QF, dipole, QD, dipole, keyed at element
/// centres.
///
/// Centres inside a cell of length `L` are `L/8`, `5L/16`, `5L/8` and
/// `13L/16`. Names carry the cell index, e.g. `QF3`, `MBA3`.
pub fn fodo_ring(cells: usize, cell: FodoCell) -> Lattice {
    let c = cell.length * cells as f64;
    let mut l = Lattice::new(c, Anchor::Center).expect("valid circumference");
    let k0 = AccTriple::new(0.0, 1.0 / cell.bend_radius, 0.0);
    for i in 0..cells {
        let s0 = cell.length * i as f64;
        let qf = Element::new(ElementKind::Quadrupole, format!("QF{i}"), cell.quad_length)
            .expect("valid length")
            .with_k1(cell.k1)
            .with_family(Family::F);
        let qd = Element::new(ElementKind::Quadrupole, format!("QD{i}"), cell.quad_length)
            .expect("valid length")
            .with_k1(cell.k1)
            .with_family(Family::D);
        let mb = |tag: &str| {
            Element::new(ElementKind::Dipole, format!("MB{tag}{i}"), cell.dipole_length)
                .expect("valid length")
                .with_k0(k0)
                .with_plane(Plane::H)
        };
        l.mount(s0 + cell.length / 8.0, qf).expect("free space");
        l.mount(s0 + cell.length * 5.0 / 16.0, mb("A")).expect("free space");
        l.mount(s0 + cell.length * 5.0 / 8.0, qd).expect("free space");
        l.mount(s0 + cell.length * 13.0 / 16.0, mb("B")).expect("free space");
    }
    l
}

/// Scalar function on a ring of `circumference`, sampled at `n` equidistant
/// positions in turn 1.
pub fn sampled_fop(
    circumference: f64,
    n: usize,
    kind: SplineKind,
    f: impl Fn(f64) -> f64,
) -> FunctionOfPos<f64> {
    let mut fop = FunctionOfPos::new(circumference, kind).expect("valid circumference");
    let step = circumference / n as f64;
    for i in 0..n {
        let s = i as f64 * step;
        fop.set(f(s), s, 1).expect("valid sample");
    }
    fop
}
