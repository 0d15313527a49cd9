//! A single accelerator element and its field model.

use crate::error::ElementError;
use accring_core::constants::{FINE_STRUCTURE, HBAR_C_EV_M, LENGTH_TOLERANCE};
use accring_core::{AccPair, AccTriple};
use std::f64::consts::{PI, TAU};
use std::fmt;
use tracing::warn;

// ── Classification ─────────────────────────────────────────────────

/// The closed set of element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Bending magnet.
    Dipole,
    /// Quadrupole.
    Quadrupole,
    /// Orbit corrector (steerer).
    Corrector,
    /// Sextupole.
    Sextupole,
    /// Thin multipole without a zero-orbit field.
    Multipole,
    /// Solenoid.
    Solenoid,
    /// RF cavity.
    Cavity,
    /// Zero-field marker.
    Marker,
    /// Beam position monitor.
    Monitor,
    /// Rectangular collimator.
    RectCollimator,
    /// Field-free drift.
    Drift,
}

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [ElementKind; 11] = [
        Self::Dipole,
        Self::Quadrupole,
        Self::Corrector,
        Self::Sextupole,
        Self::Multipole,
        Self::Solenoid,
        Self::Cavity,
        Self::Marker,
        Self::Monitor,
        Self::RectCollimator,
        Self::Drift,
    ];

    /// Whether the kind carries a magnetic field.
    pub fn is_magnet(self) -> bool {
        matches!(
            self,
            Self::Dipole
                | Self::Quadrupole
                | Self::Corrector
                | Self::Sextupole
                | Self::Multipole
                | Self::Solenoid
        )
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dipole => "Dipole",
            Self::Quadrupole => "Quadrupole",
            Self::Corrector => "Corrector",
            Self::Sextupole => "Sextupole",
            Self::Multipole => "Multipole",
            Self::Solenoid => "Solenoid",
            Self::Cavity => "Cavity",
            Self::Marker => "Marker",
            Self::Monitor => "Monitor",
            Self::RectCollimator => "RectCollimator",
            Self::Drift => "Drift",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transverse plane an element acts in. `None` acts as a wildcard in
/// filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Plane {
    /// No plane.
    #[default]
    None,
    /// Horizontal.
    H,
    /// Vertical.
    V,
}

/// Focusing family. A defocusing element flips the sign of its
/// orbit-dependent field. `None` acts as a wildcard in filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Family {
    /// No family.
    #[default]
    None,
    /// Focusing.
    F,
    /// Defocusing.
    D,
}

// ── Element ────────────────────────────────────────────────────────

/// One accelerator component.
///
/// `kind` and `length` are fixed at construction. Every other attribute is
/// public and may be changed freely, also while the element is mounted in a
/// [`Lattice`](crate::Lattice): none of them affects the footprint.
///
/// Field strengths follow the usual normalized convention: `k0` is the
/// curvature vector in 1/m (for thin elements the integrated kick), `k1`
/// and `k2` are the quadrupole and sextupole gradients in 1/m² and 1/m³.
///
/// # Examples
///
/// ```
/// use accring_core::AccTriple;
/// use accring_lattice::{Element, ElementKind};
///
/// let m = Element::new(ElementKind::Dipole, "M1", 2.0)
///     .unwrap()
///     .with_k0(AccTriple::new(0.0, 0.05, 0.0));
/// assert_eq!(m.field_zero().unwrap(), AccTriple::new(0.0, 0.05, 0.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    kind: ElementKind,
    length: f64,
    phys_length: Option<f64>,
    /// Element name.
    pub name: String,
    /// Plane.
    pub plane: Plane,
    /// Focusing family.
    pub family: Family,
    /// Orbit-independent field (curvature), 1/m.
    pub k0: AccTriple,
    /// Quadrupole strength, 1/m².
    pub k1: f64,
    /// Sextupole strength, 1/m³.
    pub k2: f64,
    /// RF modulation tune.
    pub qrf0: f64,
    /// RF modulation tune change per turn.
    pub dqrf: f64,
    /// Entrance edge angle, rad.
    pub e1: f64,
    /// Exit edge angle, rad.
    pub e2: f64,
    /// Rotation about the longitudinal axis, rad.
    pub tilt: f64,
    /// Transverse displacement, m.
    pub displacement: AccPair,
    /// Rectangular half aperture, m (collimators).
    pub half_aperture: AccPair,
    /// Cavity voltage, V.
    pub volt: f64,
    /// Cavity frequency, Hz.
    pub freq: f64,
}

impl Element {
    /// Create an element with all attributes zero.
    ///
    /// # Errors
    ///
    /// [`ElementError::InvalidLength`] for a negative or non-finite length.
    pub fn new(kind: ElementKind, name: impl Into<String>, length: f64) -> Result<Self, ElementError> {
        if !length.is_finite() || length < 0.0 {
            return Err(ElementError::InvalidLength { length });
        }
        Ok(Self::blank(kind, name.into(), length))
    }

    /// The zero-length drift returned for empty ring positions.
    pub(crate) fn empty_space() -> Self {
        Self::blank(ElementKind::Drift, "empty space".into(), 0.0)
    }

    fn blank(kind: ElementKind, name: String, length: f64) -> Self {
        Self {
            kind,
            length,
            phys_length: None,
            name,
            plane: Plane::None,
            family: Family::None,
            k0: AccTriple::default(),
            k1: 0.0,
            k2: 0.0,
            qrf0: 0.0,
            dqrf: 0.0,
            e1: 0.0,
            e2: 0.0,
            tilt: 0.0,
            displacement: AccPair::default(),
            half_aperture: AccPair::default(),
            volt: 0.0,
            freq: 0.0,
        }
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Effective (field) length, m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Physical (iron) length.
    ///
    /// An explicitly set value wins. Otherwise `length - fringe_offset`,
    /// clamped to 0 with a warning when negative.
    pub fn phys_length(&self, fringe_offset: f64) -> f64 {
        if let Some(l) = self.phys_length {
            return l;
        }
        let l = self.length - fringe_offset;
        if l < 0.0 {
            warn!(
                name = %self.name,
                length = self.length,
                fringe_offset,
                "physical length would be negative, using 0"
            );
            0.0
        } else {
            l
        }
    }

    /// Set or reset the explicit physical length.
    pub fn set_phys_length(&mut self, length: Option<f64>) -> Result<(), ElementError> {
        if let Some(l) = length {
            if !l.is_finite() || l < 0.0 {
                return Err(ElementError::InvalidPhysLength { length: l });
            }
        }
        self.phys_length = length;
        Ok(())
    }

    /// Copy all mutable attributes from `other`.
    ///
    /// # Errors
    ///
    /// [`ElementError::AssignMismatch`] unless both have the same kind and
    /// length.
    pub fn assign_from(&mut self, other: &Element) -> Result<(), ElementError> {
        if self.kind != other.kind || (self.length - other.length).abs() > LENGTH_TOLERANCE {
            return Err(ElementError::AssignMismatch {
                target: (self.kind, self.length),
                source: (other.kind, other.length),
            });
        }
        let length = self.length;
        *self = other.clone();
        self.length = length;
        Ok(())
    }

    // ── Builders ───────────────────────────────────────────────────

    /// Set `k0`.
    pub fn with_k0(mut self, k0: AccTriple) -> Self {
        self.k0 = k0;
        self
    }

    /// Set `k1`.
    pub fn with_k1(mut self, k1: f64) -> Self {
        self.k1 = k1;
        self
    }

    /// Set `k2`.
    pub fn with_k2(mut self, k2: f64) -> Self {
        self.k2 = k2;
        self
    }

    /// Set the plane.
    pub fn with_plane(mut self, plane: Plane) -> Self {
        self.plane = plane;
        self
    }

    /// Set the family.
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    /// Set the tilt.
    pub fn with_tilt(mut self, tilt: f64) -> Self {
        self.tilt = tilt;
        self
    }

    /// Set the transverse displacement.
    pub fn with_displacement(mut self, displacement: AccPair) -> Self {
        self.displacement = displacement;
        self
    }

    /// Set entrance and exit edge angles.
    pub fn with_edges(mut self, e1: f64, e2: f64) -> Self {
        self.e1 = e1;
        self.e2 = e2;
        self
    }

    /// Set the RF modulation tune and its per-turn change.
    pub fn with_rf_modulation(mut self, qrf0: f64, dqrf: f64) -> Self {
        self.qrf0 = qrf0;
        self.dqrf = dqrf;
        self
    }

    /// Set cavity voltage (V) and frequency (Hz).
    pub fn with_rf(mut self, volt: f64, freq: f64) -> Self {
        self.volt = volt;
        self.freq = freq;
        self
    }

    /// Set the rectangular half aperture.
    pub fn with_half_aperture(mut self, half_aperture: AccPair) -> Self {
        self.half_aperture = half_aperture;
        self
    }

    /// Set an explicit physical length.
    pub fn with_phys_length(mut self, length: f64) -> Result<Self, ElementError> {
        self.set_phys_length(Some(length))?;
        Ok(self)
    }

    // ── Field ──────────────────────────────────────────────────────

    /// Field at transverse orbit position `orbit`.
    ///
    /// Non-magnetic kinds return zero.
    pub fn field(&self, orbit: AccPair) -> AccTriple {
        if !self.kind.is_magnet() {
            return AccTriple::default();
        }
        let local = (orbit - self.displacement).tilted(-self.tilt);
        let (x, z) = (local.x, local.z);
        let mut b = AccTriple::new(
            self.k1 * z + self.k2 * x * z,
            self.k1 * x + self.k2 / 2.0 * (x * x - z * z),
            0.0,
        );
        if self.family == Family::D {
            b = -b;
        }
        b += self.k0;
        b.tilted(self.tilt)
    }

    /// Field on the design orbit.
    ///
    /// # Errors
    ///
    /// [`ElementError::InvalidOperation`] for a [`ElementKind::Multipole`],
    /// whose field is only defined off axis.
    pub fn field_zero(&self) -> Result<AccTriple, ElementError> {
        if self.kind == ElementKind::Multipole {
            return Err(ElementError::InvalidOperation {
                kind: self.kind,
                operation: "zero-orbit field",
            });
        }
        Ok(self.field(AccPair::default()))
    }

    /// RF amplitude modulation factor for `turn`.
    ///
    /// `cos(2π (turn·qrf0 + turn(turn+1)/2·dqrf))`, exactly 1 without
    /// modulation.
    pub fn rf_factor(&self, turn: u32) -> f64 {
        if self.qrf0 == 0.0 && self.dqrf == 0.0 {
            return 1.0;
        }
        let t = f64::from(turn);
        (TAU * (t * self.qrf0 + t * (t + 1.0) / 2.0 * self.dqrf)).cos()
    }

    /// Field at `orbit`, scaled by the RF modulation of `turn`.
    pub fn field_turn(&self, orbit: AccPair, turn: u32) -> AccTriple {
        self.field(orbit) * self.rf_factor(turn)
    }

    // ── Synchrotron radiation (Sands) ──────────────────────────────

    /// Critical photon energy in eV for Lorentz factor `gamma`.
    pub fn critical_photon_energy(&self, gamma: f64) -> f64 {
        1.5 * HBAR_C_EV_M * gamma.powi(3) * self.k0.abs()
    }

    /// Mean number of photons emitted per passage.
    pub fn mean_photon_count(&self, gamma: f64) -> f64 {
        5.0 / (2.0 * 3f64.sqrt()) * FINE_STRUCTURE * gamma * self.length * self.k0.abs()
    }

    /// Mean photon energy in eV.
    pub fn mean_photon_energy(&self, gamma: f64) -> f64 {
        8.0 / (15.0 * 3f64.sqrt()) * self.critical_photon_energy(gamma)
    }

    /// RMS photon energy in eV.
    pub fn rms_photon_energy(&self, gamma: f64) -> f64 {
        (11.0f64 / 27.0).sqrt() * self.critical_photon_energy(gamma)
    }

    /// Bending angle of a dipole, `|k0| * length`.
    pub fn bend_angle(&self) -> f64 {
        self.k0.abs() * self.length
    }

    /// Bending angle in degrees.
    pub fn bend_angle_deg(&self) -> f64 {
        self.bend_angle() * 180.0 / PI
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (L={} m)", self.kind, self.name, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: AccTriple, b: AccTriple) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn negative_length_rejected() {
        assert_eq!(
            Element::new(ElementKind::Drift, "D", -1.0),
            Err(ElementError::InvalidLength { length: -1.0 })
        );
        assert!(Element::new(ElementKind::Drift, "D", f64::NAN).is_err());
    }

    #[test]
    fn dipole_field_untilted() {
        let m = Element::new(ElementKind::Dipole, "M", 2.0)
            .unwrap()
            .with_k0(AccTriple::new(0.0, 0.05, 0.0))
            .with_family(Family::F);
        assert_eq!(m.field_zero().unwrap(), AccTriple::new(0.0, 0.05, 0.0));
    }

    #[test]
    fn dipole_field_tilted_quarter_turn() {
        let m = Element::new(ElementKind::Dipole, "M", 2.0)
            .unwrap()
            .with_k0(AccTriple::new(0.0, 0.05, 0.0))
            .with_family(Family::F)
            .with_tilt(FRAC_PI_2);
        assert!(close(m.field_zero().unwrap(), AccTriple::new(0.05, 0.0, 0.0)));
    }

    #[test]
    fn quadrupole_gradient_and_family() {
        let qf = Element::new(ElementKind::Quadrupole, "QF", 0.5)
            .unwrap()
            .with_k1(2.0)
            .with_family(Family::F);
        let b = qf.field(AccPair::new(0.01, -0.02));
        assert!(close(b, AccTriple::new(-0.04, 0.02, 0.0)));

        let mut qd = qf.clone();
        qd.family = Family::D;
        assert!(close(qd.field(AccPair::new(0.01, -0.02)), -b));
    }

    #[test]
    fn displacement_shifts_orbit() {
        let q = Element::new(ElementKind::Quadrupole, "Q", 0.5)
            .unwrap()
            .with_k1(1.0)
            .with_displacement(AccPair::new(0.01, 0.0));
        assert!(close(q.field(AccPair::new(0.01, 0.0)), AccTriple::default()));
    }

    #[test]
    fn sextupole_field() {
        let s = Element::new(ElementKind::Sextupole, "S", 0.2).unwrap().with_k2(10.0);
        let b = s.field(AccPair::new(0.1, 0.2));
        assert!(close(b, AccTriple::new(0.2, 5.0 * (0.01 - 0.04), 0.0)));
    }

    #[test]
    fn non_magnets_have_no_field() {
        for kind in [
            ElementKind::Drift,
            ElementKind::Marker,
            ElementKind::Monitor,
            ElementKind::RectCollimator,
            ElementKind::Cavity,
        ] {
            let e = Element::new(kind, "X", 1.0)
                .unwrap()
                .with_k0(AccTriple::new(1.0, 1.0, 1.0))
                .with_k1(1.0);
            assert_eq!(e.field(AccPair::new(1.0, 1.0)), AccTriple::default());
        }
    }

    #[test]
    fn multipole_has_no_zero_orbit_field() {
        let m = Element::new(ElementKind::Multipole, "MP", 0.0).unwrap().with_k1(1.0);
        assert!(matches!(
            m.field_zero(),
            Err(ElementError::InvalidOperation { .. })
        ));
        assert!(close(m.field(AccPair::new(1.0, 0.0)), AccTriple::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn rf_factor() {
        let plain = Element::new(ElementKind::Corrector, "C", 0.1).unwrap();
        assert_eq!(plain.rf_factor(17), 1.0);
        let m = plain.clone().with_rf_modulation(0.25, 0.0);
        assert!((m.rf_factor(1) - 0.0).abs() < 1e-12);
        assert!((m.rf_factor(2) + 1.0).abs() < 1e-12);
        let sweep = plain.with_rf_modulation(0.0, 0.5);
        // turn 1: 2π·0.5 → -1
        assert!((sweep.rf_factor(1) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn assign_requires_same_kind_and_length() {
        let mut a = Element::new(ElementKind::Quadrupole, "A", 0.5).unwrap();
        let b = Element::new(ElementKind::Quadrupole, "B", 0.5)
            .unwrap()
            .with_k1(3.0);
        a.assign_from(&b).unwrap();
        assert_eq!(a.name, "B");
        assert_eq!(a.k1, 3.0);

        let c = Element::new(ElementKind::Sextupole, "C", 0.5).unwrap();
        assert!(matches!(
            a.assign_from(&c),
            Err(ElementError::AssignMismatch { .. })
        ));
        let d = Element::new(ElementKind::Quadrupole, "D", 0.6).unwrap();
        assert!(a.assign_from(&d).is_err());
    }

    #[test]
    fn phys_length_default_and_clamp() {
        let mut e = Element::new(ElementKind::Dipole, "M", 1.0).unwrap();
        assert_eq!(e.phys_length(0.2), 0.8);
        assert_eq!(e.phys_length(1.5), 0.0);
        e.set_phys_length(Some(0.9)).unwrap();
        assert_eq!(e.phys_length(0.2), 0.9);
        assert!(e.set_phys_length(Some(-0.1)).is_err());
    }

    #[test]
    fn sands_photon_energies() {
        let m = Element::new(ElementKind::Dipole, "M", 1.0)
            .unwrap()
            .with_k0(AccTriple::new(0.0, 0.1, 0.0));
        let gamma = 1000.0;
        let ec = m.critical_photon_energy(gamma);
        assert!((ec - 1.5 * HBAR_C_EV_M * 1e9 * 0.1).abs() < 1e-9);
        assert!((m.mean_photon_energy(gamma) / ec - 8.0 / (15.0 * 3f64.sqrt())).abs() < 1e-12);
        assert!(m.rms_photon_energy(gamma) > m.mean_photon_energy(gamma));
    }

    proptest! {
        #[test]
        fn tilt_preserves_field_magnitude(
            k0z in -1.0f64..1.0,
            tilt in -7.0f64..7.0,
        ) {
            let m = Element::new(ElementKind::Dipole, "M", 1.0)
                .unwrap()
                .with_k0(AccTriple::new(0.0, k0z, 0.0))
                .with_tilt(tilt);
            let b = m.field_zero().unwrap();
            prop_assert!((b.abs() - k0z.abs()).abs() < 1e-12);
        }
    }
}
