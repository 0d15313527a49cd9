//! Harmonic strengths of the horizontal field distribution.

use crate::anchor::Anchor;
use crate::lattice::Lattice;
use accring_core::AccPair;
use num_complex::Complex64;
use std::collections::HashMap;
use std::f64::consts::TAU;
use tracing::debug;

/// Resonance strengths `ε(κ) = |1/2π · Σ kxᵢ·Lᵢ·exp(iκθᵢ)|`.
///
/// `kxᵢ` is the horizontal zero-orbit field of element `i` (vertical
/// correctors, tilted dipoles, rolled magnets), `θᵢ = 2π·sᵢ/C` the phase
/// of its centre. Thin elements contribute their stored kick unscaled.
///
/// Sums are memoized by the exact bit pattern of `κ`, so `0.0` and `-0.0`
/// or values that differ in the last bit are computed separately.
#[derive(Clone, Debug)]
pub struct ResonanceStrengths {
    sources: Vec<(f64, f64)>,
    cache: HashMap<u64, Complex64>,
}

impl ResonanceStrengths {
    /// Collect the horizontal-field sources of `lattice`.
    pub fn new(lattice: &Lattice) -> Self {
        let c = lattice.circumference();
        let sources: Vec<(f64, f64)> = lattice
            .iter()
            .filter(|(_, e)| e.kind().is_magnet())
            .filter_map(|(key, e)| {
                let kx = e.field(AccPair::default()).x;
                if kx == 0.0 {
                    return None;
                }
                let weight = if e.length() > 0.0 { kx * e.length() } else { kx };
                let theta = TAU * lattice.locate(key, e, Anchor::Center) / c;
                Some((theta, weight))
            })
            .collect();
        debug!(sources = sources.len(), "resonance sources collected");
        Self {
            sources,
            cache: HashMap::new(),
        }
    }

    /// Number of contributing elements.
    pub fn sources(&self) -> usize {
        self.sources.len()
    }

    /// The complex harmonic sum at `kappa`, including the `1/2π` factor.
    pub fn complex(&mut self, kappa: f64) -> Complex64 {
        let sources = &self.sources;
        *self.cache.entry(kappa.to_bits()).or_insert_with(|| {
            sources
                .iter()
                .map(|&(theta, weight)| Complex64::from_polar(weight, kappa * theta))
                .sum::<Complex64>()
                / TAU
        })
    }

    /// `ε(κ)`.
    pub fn strength(&mut self, kappa: f64) -> f64 {
        self.complex(kappa).norm()
    }

    /// `ε` for each of `kappas`, paired with its `κ`.
    pub fn scan(&mut self, kappas: impl IntoIterator<Item = f64>) -> Vec<(f64, f64)> {
        kappas.into_iter().map(|k| (k, self.strength(k))).collect()
    }

    /// Number of memoized values.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drop all memoized values.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
