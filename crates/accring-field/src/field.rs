//! Magnetic field sampled along a ring.

use crate::error::FieldError;
use accring_core::{AccPair, AccTriple};
use accring_fop::FunctionOfPos;
use accring_interp::SplineKind;
use accring_lattice::Lattice;
use tracing::{debug, info};

/// The field `(Bx, Bz, Bs)` seen along an orbit, one value per sample
/// position and turn.
#[derive(Clone, Debug)]
pub struct Field {
    data: FunctionOfPos<AccTriple>,
}

impl Field {
    /// Create an empty field on a ring of `circumference`.
    pub fn new(circumference: f64, kind: SplineKind) -> Result<Self, FieldError> {
        Ok(Self {
            data: FunctionOfPos::new(circumference, kind)?,
        })
    }

    /// Sample the field of `lattice` along `orbit`.
    ///
    /// For every turn of `orbit`, `n_samples` equidistant positions
    /// `i * C / n_samples` are evaluated. The orbit is interpolated
    /// periodically over all its turns; a non-periodic orbit kind fails
    /// with an out-of-range error beyond its last sample.
    ///
    /// With `edgefields` the dipole-edge blending of
    /// [`Lattice::field_edge`] is used, otherwise the RF-modulated
    /// [`Lattice::field_turn`] of the turn.
    ///
    /// Previous samples are discarded.
    ///
    /// # Errors
    ///
    /// [`FieldError::NoSamples`] for `n_samples == 0`,
    /// [`FieldError::EmptyOrbit`] for an orbit without data,
    /// [`FieldError::CircumferenceMismatch`] if the rings differ, and any
    /// interpolation or lattice error.
    pub fn set(
        &mut self,
        lattice: &Lattice,
        orbit: &FunctionOfPos<AccPair>,
        n_samples: usize,
        edgefields: bool,
    ) -> Result<(), FieldError> {
        if n_samples == 0 {
            return Err(FieldError::NoSamples);
        }
        if orbit.is_empty() {
            return Err(FieldError::EmptyOrbit);
        }
        let c = self.data.circumference();
        if lattice.circumference() != c || orbit.circumference() != c {
            return Err(FieldError::CircumferenceMismatch {
                lattice: lattice.circumference(),
                orbit: orbit.circumference(),
            });
        }

        let mut orbit = orbit.clone();
        self.sample(lattice, orbit.n_turns(), n_samples, edgefields, |pos| {
            Ok(orbit.interp_periodic(pos)?)
        })
    }

    /// Sample the field of `lattice` on the design orbit (zero offset) for
    /// one turn.
    pub fn set_design(
        &mut self,
        lattice: &Lattice,
        n_samples: usize,
        edgefields: bool,
    ) -> Result<(), FieldError> {
        if n_samples == 0 {
            return Err(FieldError::NoSamples);
        }
        if lattice.circumference() != self.data.circumference() {
            return Err(FieldError::CircumferenceMismatch {
                lattice: lattice.circumference(),
                orbit: self.data.circumference(),
            });
        }
        debug!(circumference = lattice.circumference(), "sampling on the design orbit");
        self.sample(lattice, 1, n_samples, edgefields, |_| Ok(AccPair::default()))
    }

    fn sample(
        &mut self,
        lattice: &Lattice,
        n_turns: u32,
        n_samples: usize,
        edgefields: bool,
        mut orbit_at: impl FnMut(f64) -> Result<AccPair, FieldError>,
    ) -> Result<(), FieldError> {
        let c = self.data.circumference();
        let mut data = FunctionOfPos::with_grid(c, self.data.kind(), n_samples, n_turns)?;
        for index in 0..data.len() {
            let pos = data.position(index)?;
            let turn = data.turn(pos);
            let pos_in_turn = data.pos_in_turn(pos);
            let x = orbit_at(pos)?;
            let b = if edgefields {
                lattice.field_edge(pos_in_turn, x)?
            } else {
                lattice.field_turn(pos_in_turn, x, turn)?
            };
            data.modify_at(index, b)?;
        }

        *data.metadata_mut() = self.data.metadata().clone();
        let meta = data.metadata_mut();
        meta.add("samples per turn", n_samples);
        meta.add("edge fields", if edgefields { "on" } else { "off" });
        self.data = data;
        info!(
            samples = self.data.len(),
            turns = n_turns,
            edgefields,
            "field sampled"
        );
        Ok(())
    }

    /// The sampled field.
    pub fn function(&self) -> &FunctionOfPos<AccTriple> {
        &self.data
    }

    /// Mutable access to the sampled field, e.g. to interpolate it.
    pub fn function_mut(&mut self) -> &mut FunctionOfPos<AccTriple> {
        &mut self.data
    }

    /// Take the sampled field.
    pub fn into_function(self) -> FunctionOfPos<AccTriple> {
        self.data
    }
}
