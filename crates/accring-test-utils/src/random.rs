//! Reproducible random lattices.

use accring_core::AccTriple;
use accring_lattice::{locate, Anchor, Element, ElementKind, Family, Lattice, LatticeConfig};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builder for a random, non-overlapping lattice.
///
/// The ring is cut into `slots` equal slots; each slot holds at most one
/// element of random kind, length and offset inside the slot, so every
/// generated layout is valid by construction. The same seed always yields
/// the same lattice.
#[derive(Clone, Debug)]
pub struct RandomLattice {
    pub seed: u64,
    pub circumference: f64,
    pub slots: usize,
    pub fill: f64,
    pub ref_pos: Anchor,
    pub config: LatticeConfig,
}

impl RandomLattice {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            circumference: 100.0,
            slots: 50,
            fill: 0.8,
            ref_pos: Anchor::Begin,
            config: LatticeConfig::default(),
        }
    }

    pub fn circumference(mut self, circumference: f64) -> Self {
        self.circumference = circumference;
        self
    }

    pub fn slots(mut self, slots: usize) -> Self {
        self.slots = slots;
        self
    }

    /// Probability that a slot is occupied.
    pub fn fill(mut self, fill: f64) -> Self {
        self.fill = fill;
        self
    }

    pub fn ref_pos(mut self, ref_pos: Anchor) -> Self {
        self.ref_pos = ref_pos;
        self
    }

    pub fn config(mut self, config: LatticeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(&self) -> Lattice {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut lattice = Lattice::with_config(self.circumference, self.ref_pos, self.config)
            .expect("valid lattice parameters");
        let slot = self.circumference / self.slots.max(1) as f64;
        for i in 0..self.slots {
            if uniform(&mut rng) >= self.fill {
                continue;
            }
            let kind = ElementKind::ALL[(rng.next_u32() as usize) % ElementKind::ALL.len()];
            let length = if matches!(kind, ElementKind::Marker | ElementKind::Monitor) {
                0.0
            } else {
                slot * (0.1 + 0.8 * uniform(&mut rng))
            };
            let begin = slot * i as f64 + (slot - length) * uniform(&mut rng);
            let element = random_element(&mut rng, kind, format!("E{i}"), length);
            let key = locate(begin, length, Anchor::Begin, self.ref_pos);
            lattice.mount(key, element).expect("slot is free");
        }
        lattice
    }
}

/// Uniform sample in `[0, 1)` from the top 53 bits.
pub fn uniform(rng: &mut impl RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

fn random_element(rng: &mut ChaCha8Rng, kind: ElementKind, name: String, length: f64) -> Element {
    let mut e = Element::new(kind, name, length).expect("non-negative length");
    let strength = 0.5 * (2.0 * uniform(rng) - 1.0);
    match kind {
        ElementKind::Dipole => e.k0 = AccTriple::new(0.0, strength.abs() * 0.1 + 0.01, 0.0),
        ElementKind::Corrector => e.k0 = AccTriple::new(strength * 1e-3, 0.0, 0.0),
        ElementKind::Quadrupole => {
            e.k1 = strength.abs();
            e.family = if strength < 0.0 { Family::D } else { Family::F };
        }
        ElementKind::Sextupole => {
            e.k2 = strength.abs();
            e.family = if strength < 0.0 { Family::D } else { Family::F };
        }
        _ => {}
    }
    e
}
