//! End-to-end lattice behaviour on small hand-built rings.

use accring_core::{AccPair, AccTriple};
use accring_lattice::{Anchor, Dialect, Element, ElementKind, Family, Lattice, LatticeError};
use accring_test_utils::{fodo_ring, two_magnet_ring, FodoCell};
use std::f64::consts::{FRAC_PI_2, TAU};

#[test]
fn dipole_and_quadrupole_with_gap() {
    let l = two_magnet_ring();
    assert_eq!(l.len(), 2);
    assert_eq!(l.at(3.0).unwrap().name, "M1");
    let gap = l.at(4.9).unwrap();
    assert_eq!(gap.kind(), ElementKind::Drift);
    assert!(l.is_empty_space(gap));
}

#[test]
fn overlapping_mount_names_the_neighbour() {
    let mut l = two_magnet_ring();
    let s = Element::new(ElementKind::Sextupole, "S1", 1.0).unwrap();
    match l.mount(4.6, s) {
        Err(LatticeError::NoFreeSpace { colliding, begin, end, .. }) => {
            assert_eq!(colliding, vec!["Q1".to_string()]);
            assert!((begin - 4.6).abs() < 1e-12);
            assert!((end - 5.6).abs() < 1e-12);
        }
        other => panic!("expected a collision, got {other:?}"),
    }
    assert_eq!(l.len(), 2);
}

#[test]
fn dipole_field_rotates_with_tilt() {
    let m = Element::new(ElementKind::Dipole, "M", 2.0)
        .unwrap()
        .with_k0(AccTriple::new(0.0, 0.05, 0.0))
        .with_family(Family::F);
    assert_eq!(m.field_zero().unwrap(), AccTriple::new(0.0, 0.05, 0.0));

    let tilted = m.with_tilt(FRAC_PI_2).field_zero().unwrap();
    assert!((tilted - AccTriple::new(0.05, 0.0, 0.0)).abs() < 1e-12);
}

#[test]
fn fodo_ring_summaries() {
    let cell = FodoCell::default();
    let l = fodo_ring(8, cell);
    assert_eq!(l.len(), 32);
    assert_eq!(l.count(ElementKind::Dipole), 16);
    assert!((l.dipole_length() - 48.0).abs() < 1e-9);
    assert!((l.avg_bending_radius(1.0).unwrap() - cell.bend_radius).abs() < 1e-9);

    let (key, qd) = l.typed(ElementKind::Quadrupole).nth(1).unwrap();
    assert_eq!(qd.name, "QD0");
    assert_eq!(qd.family, Family::D);
    assert!((l.locate(key, qd, Anchor::Center) - 6.25).abs() < 1e-12);
}

#[test]
fn field_follows_the_occupant() {
    let l = fodo_ring(4, FodoCell::default());
    let orbit = AccPair::new(0.01, 0.0);
    // centre of QF0 and QD0
    let bf = l.field(1.25, orbit).unwrap();
    let bd = l.field(6.25, orbit).unwrap();
    assert!((bf.z - 0.004).abs() < 1e-12);
    assert!((bd.z + 0.004).abs() < 1e-12);
    // dipole
    assert!((l.field(3.125, AccPair::default()).unwrap().z - 0.05).abs() < 1e-12);
    // drift between QF0 and MBA0
    assert_eq!(l.field(1.55, orbit).unwrap(), AccTriple::default());
}

#[test]
fn export_round_trip_through_sequence_text() {
    let l = fodo_ring(2, FodoCell::default());
    let madx = l.export(Dialect::Madx);
    assert!(madx.contains("REFER=CENTRE"));
    for (key, e) in l.iter() {
        assert!(madx.contains(&format!("  {}, AT={key};", e.name)));
    }
    let elegant = l.export(Dialect::Elegant);
    let line = elegant.lines().last().unwrap();
    assert!(line.starts_with("RING: LINE=(D0, QF0"));
}

#[test]
fn bending_adds_up_to_full_circle() {
    let cell = FodoCell {
        bend_radius: 16.0 * 3.0 / TAU,
        ..FodoCell::default()
    };
    let l = fodo_ring(8, cell);
    let total: f64 = l.filter(ElementKind::Dipole).map(|(_, e)| e.bend_angle()).sum();
    assert!((total - TAU).abs() < 1e-9);
}
