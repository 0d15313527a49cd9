//! The closed set of value shapes that can be stored per position.
//!
//! Interpolation, column reads and arithmetic between position functions
//! work component-wise. Exactly three shapes are supported: a scalar
//! (`f64`), a transverse [`AccPair`] and a field [`AccTriple`]. The trait is
//! sealed so the set cannot grow outside this crate.

use crate::geometry::{AccPair, AccTriple};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::ops::{Add, Mul, Sub};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for super::AccPair {}
    impl Sealed for super::AccTriple {}
}

/// A value made of `DIM` independent `f64` components.
pub trait Components:
    sealed::Sealed
    + Copy
    + Default
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + 'static
{
    /// Number of scalar components (1, 2 or 3).
    const DIM: usize;

    /// Component labels used for table headers.
    const LABELS: &'static [&'static str];

    /// The `i`-th component. `i` must be `< DIM`.
    fn component(&self, i: usize) -> f64;

    /// Build a value from the first `DIM` entries of `c`.
    ///
    /// Callers guarantee `c.len() >= DIM`.
    fn from_components(c: &[f64]) -> Self;

    /// All components in order.
    fn components(&self) -> SmallVec<[f64; 3]> {
        (0..Self::DIM).map(|i| self.component(i)).collect()
    }

    /// `true` if every component is finite.
    fn is_finite(&self) -> bool {
        (0..Self::DIM).all(|i| self.component(i).is_finite())
    }
}

impl Components for f64 {
    const DIM: usize = 1;
    const LABELS: &'static [&'static str] = &["value"];

    fn component(&self, _i: usize) -> f64 {
        *self
    }

    fn from_components(c: &[f64]) -> Self {
        c[0]
    }

    fn components(&self) -> SmallVec<[f64; 3]> {
        smallvec![*self]
    }
}

impl Components for AccPair {
    const DIM: usize = 2;
    const LABELS: &'static [&'static str] = &["x", "z"];

    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            _ => self.z,
        }
    }

    fn from_components(c: &[f64]) -> Self {
        AccPair::new(c[0], c[1])
    }
}

impl Components for AccTriple {
    const DIM: usize = 3;
    const LABELS: &'static [&'static str] = &["x", "z", "s"];

    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.z,
            _ => self.s,
        }
    }

    fn from_components(c: &[f64]) -> Self {
        AccTriple::new(c[0], c[1], c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: Components>(v: T) -> T {
        T::from_components(&v.components())
    }

    #[test]
    fn components_match_dimension() {
        assert_eq!(2.5f64.components().as_slice(), &[2.5]);
        assert_eq!(AccPair::new(1.0, 2.0).components().as_slice(), &[1.0, 2.0]);
        assert_eq!(
            AccTriple::new(1.0, 2.0, 3.0).components().as_slice(),
            &[1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn rebuild_from_components() {
        assert_eq!(round_trip(AccTriple::new(4.0, 5.0, 6.0)), AccTriple::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn finiteness() {
        assert!(AccPair::new(1.0, 2.0).is_finite());
        assert!(!AccPair::new(f64::NAN, 2.0).is_finite());
        assert!(!f64::INFINITY.is_finite());
    }
}
