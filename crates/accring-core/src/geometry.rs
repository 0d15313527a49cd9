//! Transverse pairs `(x, z)` and field triples `(x, z, s)`.
//!
//! `x` is the horizontal, `z` the vertical and `s` the longitudinal
//! component. Both types are plain `Copy` values; their `Default` is the
//! zero vector.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Transverse quantity such as an orbit offset or a displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccPair {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub z: f64,
}

impl AccPair {
    /// Create a new pair.
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Rotate about the longitudinal axis by `angle` (rad).
    ///
    /// `(x, z) -> (x cos a + z sin a, -x sin a + z cos a)`.
    pub fn tilted(&self, angle: f64) -> Self {
        if angle == 0.0 {
            return *self;
        }
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Euclidean magnitude.
    pub fn abs(&self) -> f64 {
        self.x.hypot(self.z)
    }

    /// `true` if both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.z == 0.0
    }
}

impl Add for AccPair {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for AccPair {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Neg for AccPair {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.z)
    }
}

impl Mul<f64> for AccPair {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.z * s)
    }
}

impl AddAssign for AccPair {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for AccPair {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f64> for AccPair {
    fn mul_assign(&mut self, s: f64) {
        *self = *self * s;
    }
}

impl fmt::Display for AccPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Three-component quantity, typically a magnetic field `(Bx, Bz, Bs)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccTriple {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub z: f64,
    /// Longitudinal component.
    pub s: f64,
}

impl AccTriple {
    /// Create a new triple.
    pub const fn new(x: f64, z: f64, s: f64) -> Self {
        Self { x, z, s }
    }

    /// Rotate the transverse part by `angle` (rad); `s` is unchanged.
    ///
    /// Uses the same convention as [`AccPair::tilted`].
    pub fn tilted(&self, angle: f64) -> Self {
        let t = self.transverse().tilted(angle);
        Self::new(t.x, t.z, self.s)
    }

    /// The `(x, z)` part.
    pub fn transverse(&self) -> AccPair {
        AccPair::new(self.x, self.z)
    }

    /// Euclidean magnitude of all three components.
    pub fn abs(&self) -> f64 {
        (self.x * self.x + self.z * self.z + self.s * self.s).sqrt()
    }

    /// `true` if all components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.z == 0.0 && self.s == 0.0
    }
}

impl From<AccPair> for AccTriple {
    fn from(p: AccPair) -> Self {
        Self::new(p.x, p.z, 0.0)
    }
}

impl Add for AccTriple {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z, self.s + rhs.s)
    }
}

impl Sub for AccTriple {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z, self.s - rhs.s)
    }
}

impl Neg for AccTriple {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.z, -self.s)
    }
}

impl Mul<f64> for AccTriple {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.z * s, self.s * s)
    }
}

impl AddAssign for AccTriple {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for AccTriple {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f64> for AccTriple {
    fn mul_assign(&mut self, s: f64) {
        *self = *self * s;
    }
}

impl fmt::Display for AccTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.z, self.s)
    }
}
