//! Whole-lattice summaries: bending, RF and synchrotron radiation.

use crate::cursor::Filter;
use crate::element::ElementKind;
use crate::lattice::Lattice;
use accring_core::constants::{ELECTRON_MASS_EV, ELECTRON_RADIUS, SPEED_OF_LIGHT};

/// Photon emission per turn, summed over all dipoles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhotonStats {
    /// Mean number of photons emitted per turn.
    pub photons_per_turn: f64,
    /// Photon-weighted mean critical energy, eV.
    pub critical_energy: f64,
    /// Mean photon energy, eV.
    pub mean_energy: f64,
    /// RMS photon energy, eV.
    pub rms_energy: f64,
}

impl Lattice {
    /// Number of elements matching `filter`.
    pub fn count(&self, filter: impl Into<Filter>) -> usize {
        self.filter(filter).count()
    }

    /// Summed length of all elements of `kind`, m.
    pub fn integral_length(&self, kind: ElementKind) -> f64 {
        self.filter(kind).map(|(_, e)| e.length()).sum()
    }

    /// Summed length of all dipoles, m.
    pub fn dipole_length(&self) -> f64 {
        self.integral_length(ElementKind::Dipole)
    }

    /// Length-weighted average bending radius over dipoles,
    /// `(Σ L·ρ^p / Σ L)^(1/p)` with `ρ = 1/|k0|`.
    ///
    /// `None` without bending dipoles or for `exponent == 0`.
    pub fn avg_bending_radius(&self, exponent: f64) -> Option<f64> {
        if exponent == 0.0 || !exponent.is_finite() {
            return None;
        }
        let (weighted, length) = self
            .filter(ElementKind::Dipole)
            .map(|(_, e)| e)
            .filter(|e| e.k0.abs() > 0.0)
            .fold((0.0, 0.0), |(w, l), e| {
                (w + e.length() * e.k0.abs().powf(-exponent), l + e.length())
            });
        if length <= 0.0 {
            return None;
        }
        Some((weighted / length).powf(1.0 / exponent))
    }

    /// Revolution frequency for a particle at the speed of light, Hz.
    pub fn revolution_frequency(&self) -> f64 {
        SPEED_OF_LIGHT / self.circumference()
    }

    /// Harmonic number of the first cavity with a frequency set.
    pub fn harmonic_number(&self) -> Option<u64> {
        self.filter(ElementKind::Cavity)
            .map(|(_, e)| e.freq)
            .find(|f| *f > 0.0)
            .map(|f| (f / self.revolution_frequency()).round() as u64)
    }

    /// Energy radiated per turn by an electron with Lorentz factor
    /// `gamma`, eV.
    pub fn energy_loss_per_turn(&self, gamma: f64) -> f64 {
        let integral: f64 = self
            .filter(ElementKind::Dipole)
            .map(|(_, e)| e.length() * e.k0.abs().powi(2))
            .sum();
        2.0 / 3.0 * ELECTRON_RADIUS * ELECTRON_MASS_EV * gamma.powi(4) * integral
    }

    /// Photon emission statistics for Lorentz factor `gamma`.
    ///
    /// Energies are averaged over all dipoles, weighted by the number of
    /// photons each one emits.
    pub fn photon_stats(&self, gamma: f64) -> PhotonStats {
        let mut stats = PhotonStats::default();
        let mut mean_sq = 0.0;
        for (_, e) in self.filter(ElementKind::Dipole) {
            let n = e.mean_photon_count(gamma);
            stats.photons_per_turn += n;
            stats.critical_energy += n * e.critical_photon_energy(gamma);
            stats.mean_energy += n * e.mean_photon_energy(gamma);
            mean_sq += n * e.rms_photon_energy(gamma).powi(2);
        }
        if stats.photons_per_turn > 0.0 {
            stats.critical_energy /= stats.photons_per_turn;
            stats.mean_energy /= stats.photons_per_turn;
            stats.rms_energy = (mean_sq / stats.photons_per_turn).sqrt();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::element::{Element, Family};
    use accring_core::AccTriple;

    fn ring(rho: &[f64]) -> Lattice {
        let mut l = Lattice::new(100.0, Anchor::Begin).unwrap();
        for (i, r) in rho.iter().enumerate() {
            let m = Element::new(ElementKind::Dipole, format!("M{i}"), 2.0)
                .unwrap()
                .with_k0(AccTriple::new(0.0, 1.0 / r, 0.0));
            l.mount(10.0 * i as f64, m).unwrap();
        }
        l
    }

    #[test]
    fn dipole_length_and_count() {
        let mut l = ring(&[10.0, 10.0, 10.0]);
        let q = Element::new(ElementKind::Quadrupole, "Q", 0.5)
            .unwrap()
            .with_family(Family::D);
        l.mount(50.0, q).unwrap();
        assert_eq!(l.dipole_length(), 6.0);
        assert_eq!(l.count(ElementKind::Dipole), 3);
        assert_eq!(l.count(Filter::new(ElementKind::Quadrupole).family(Family::F)), 0);
        assert_eq!(l.integral_length(ElementKind::Quadrupole), 0.5);
    }

    #[test]
    fn bending_radius() {
        let l = ring(&[10.0, 10.0]);
        assert!((l.avg_bending_radius(1.0).unwrap() - 10.0).abs() < 1e-12);
        let mixed = ring(&[5.0, 20.0]);
        assert!((mixed.avg_bending_radius(1.0).unwrap() - 12.5).abs() < 1e-12);
        assert!(Lattice::new(10.0, Anchor::Begin)
            .unwrap()
            .avg_bending_radius(1.0)
            .is_none());
        assert!(l.avg_bending_radius(0.0).is_none());
    }

    #[test]
    fn harmonic_number_from_cavity() {
        let mut l = ring(&[10.0]);
        let f_rev = l.revolution_frequency();
        let cav = Element::new(ElementKind::Cavity, "C", 0.3)
            .unwrap()
            .with_rf(1e5, 40.0 * f_rev * 1.001);
        l.mount(60.0, cav).unwrap();
        assert_eq!(l.harmonic_number(), Some(40));
        assert_eq!(ring(&[10.0]).harmonic_number(), None);
    }

    #[test]
    fn energy_loss_isomagnetic_ring() {
        // 2π bending at radius ρ: U = 4π/3 · r_e · mc² · γ⁴ / ρ
        let rho = 10.0;
        let mut l = Lattice::new(100.0, Anchor::Begin).unwrap();
        let n = 8;
        let len = std::f64::consts::TAU * rho / f64::from(n);
        for i in 0..n {
            let m = Element::new(ElementKind::Dipole, format!("M{i}"), len)
                .unwrap()
                .with_k0(AccTriple::new(0.0, 1.0 / rho, 0.0));
            l.mount(f64::from(i) * 12.0, m).unwrap();
        }
        let gamma: f64 = 2000.0;
        let expected = 4.0 * std::f64::consts::PI / 3.0 * ELECTRON_RADIUS * ELECTRON_MASS_EV
            * gamma.powi(4)
            / rho;
        let u = l.energy_loss_per_turn(gamma);
        assert!((u - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn photon_stats_uniform_dipoles() {
        let l = ring(&[10.0, 10.0]);
        let gamma = 1000.0;
        let s = l.photon_stats(gamma);
        let m = l.iter().next().unwrap().1;
        assert!((s.photons_per_turn - 2.0 * m.mean_photon_count(gamma)).abs() < 1e-12);
        assert!((s.critical_energy - m.critical_photon_energy(gamma)).abs() < 1e-9);
        assert!((s.mean_energy - m.mean_photon_energy(gamma)).abs() < 1e-9);
        assert!((s.rms_energy - m.rms_photon_energy(gamma)).abs() < 1e-9);
    }
}
