//! Field with smooth dipole edges.
//!
//! This is an approximate model. Each dipole edge is smeared over a linear
//! ramp of width `length - phys_length` centred on the effective edge.
//! Inside the ramp the dipole field is blended linearly with the field of
//! the element on the other side, and the edge angle adds a vertical
//! focusing term `k0.z · tan(e) · z / width` to `Bx`, so the integral over
//! the ramp matches a thin edge kick.

use crate::element::{Element, ElementKind};
use crate::error::LatticeError;
use crate::lattice::Lattice;
use accring_core::{AccPair, AccTriple};

struct Ramp<'a> {
    dipole: &'a Element,
    /// Weight of the dipole field, 0 outside the dipole, 1 inside.
    weight: f64,
    neighbour_pos: f64,
    angle: f64,
    width: f64,
}

impl Lattice {
    /// Field at `pos` for transverse `orbit`, with dipole edges blended
    /// into their neighbours.
    ///
    /// Outside every edge ramp this equals [`field`](Self::field).
    pub fn field_edge(&self, pos: f64, orbit: AccPair) -> Result<AccTriple, LatticeError> {
        let here = self.at(pos)?;
        let Some(ramp) = self.ramp_at(pos) else {
            return Ok(here.field(orbit));
        };
        let neighbour = self.at(ramp.neighbour_pos)?;
        let outside = if std::ptr::eq(neighbour, ramp.dipole) {
            AccTriple::default()
        } else {
            neighbour.field(orbit)
        };
        let mut b = ramp.dipole.field(orbit) * ramp.weight + outside * (1.0 - ramp.weight);
        b.x += ramp.dipole.k0.z * ramp.angle.tan() * orbit.z / ramp.width;
        Ok(b)
    }

    fn ramp_at(&self, pos: f64) -> Option<Ramp<'_>> {
        let entries = self.entries();
        let n = entries.len();
        if n == 0 {
            return None;
        }
        let c = self.circumference();
        let i = entries.partition_point(|(k, _)| *k <= pos);
        // immediate neighbours by key, plus the ring ends for wrap-around
        let mut candidates = [i.wrapping_sub(2), i.wrapping_sub(1), i, i + 1, 0, n - 1];
        candidates.sort_unstable();
        let mut last = usize::MAX;
        for j in candidates {
            if j >= n || j == last {
                continue;
            }
            last = j;
            let (key, e) = &entries[j];
            if e.kind() != ElementKind::Dipole {
                continue;
            }
            let width = e.length() - self.phys_length(e);
            if width <= 0.0 {
                continue;
            }
            let (begin, end) = self.footprint(*key, e);
            let half = width / 2.0;

            let d = signed_ring_offset(pos - begin, c);
            if d.abs() <= half {
                return Some(Ramp {
                    dipole: e,
                    weight: (d + half) / width,
                    neighbour_pos: (begin - half).rem_euclid(c),
                    angle: e.e1,
                    width,
                });
            }
            let d = signed_ring_offset(pos - end, c);
            if d.abs() <= half {
                return Some(Ramp {
                    dipole: e,
                    weight: (half - d) / width,
                    neighbour_pos: (end + half).rem_euclid(c),
                    angle: e.e2,
                    width,
                });
            }
        }
        None
    }
}

/// `d` folded into `(-c/2, c/2]`.
fn signed_ring_offset(d: f64, c: f64) -> f64 {
    let r = d.rem_euclid(c);
    if r > c / 2.0 {
        r - c
    } else {
        r
    }
}
