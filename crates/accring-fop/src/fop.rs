//! The turn-aware position function.

use crate::error::FopError;
use accring_core::constants::TURN_EPSILON;
use accring_core::{Components, Metadata};
use accring_interp::{Interpolator, SplineKind};
use tracing::debug;

/// Samples of `T` along a ring, over one or more turns.
///
/// Positions are stored as absolute positions
/// `pos_in_turn + (turn - 1) * circumference`. The turn count grows as data
/// for later turns is inserted and only shrinks through
/// [`truncate_turns`](Self::truncate_turns) or [`clear`](Self::clear).
///
/// For periodic spline kinds the interpolation period follows
/// `circumference * n_turns`.
///
/// # Examples
///
/// ```
/// use accring_fop::FunctionOfPos;
/// use accring_interp::SplineKind;
///
/// let mut f = FunctionOfPos::<f64>::new(10.0, SplineKind::CsplinePeriodic).unwrap();
/// f.set(1.0, 2.0, 1).unwrap();
/// f.set(2.0, 8.0, 1).unwrap();
/// let v = f.interp(5.0, 1).unwrap();
/// assert!(v > 1.0 && v < 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct FunctionOfPos<T: Components> {
    circumference: f64,
    n_turns: u32,
    data: Interpolator<T>,
    metadata: Metadata,
}

impl<T: Components> FunctionOfPos<T> {
    /// Create an empty function on a ring of the given circumference.
    pub fn new(circumference: f64, kind: SplineKind) -> Result<Self, FopError> {
        if !circumference.is_finite() || circumference <= 0.0 {
            return Err(FopError::InvalidCircumference {
                value: circumference,
            });
        }
        Ok(Self {
            circumference,
            n_turns: 0,
            data: Interpolator::new(kind),
            metadata: Metadata::new(),
        })
    }

    /// Create a function pre-populated with an equidistant grid.
    ///
    /// `samples_per_turn` zero-valued samples are registered in each of
    /// `n_turns` turns, at `i * circumference / samples_per_turn`. Use
    /// [`get`](Self::get) and [`modify_at`](Self::modify_at) with the grid
    /// index to fill them without a position search.
    pub fn with_grid(
        circumference: f64,
        kind: SplineKind,
        samples_per_turn: usize,
        n_turns: u32,
    ) -> Result<Self, FopError> {
        let mut f = Self::new(circumference, kind)?;
        if n_turns == 0 {
            return Err(FopError::InvalidTurn { turn: 0 });
        }
        let step = circumference / samples_per_turn.max(1) as f64;
        for turn in 1..=n_turns {
            for i in 0..samples_per_turn {
                f.set(T::default(), i as f64 * step, turn)?;
            }
        }
        Ok(f)
    }

    // ── Addressing ─────────────────────────────────────────────────

    /// Ring circumference.
    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// Highest turn with data (0 when empty).
    pub fn n_turns(&self) -> u32 {
        self.n_turns
    }

    /// Spline kind.
    pub fn kind(&self) -> SplineKind {
        self.data.kind()
    }

    /// Number of stored samples over all turns.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Absolute position of `pos_in_turn` in `turn`.
    pub fn pos_total(&self, pos_in_turn: f64, turn: u32) -> f64 {
        pos_in_turn + f64::from(turn.saturating_sub(1)) * self.circumference
    }

    /// Turn containing the absolute position `pos`.
    ///
    /// A position within [`TURN_EPSILON`] of a turn boundary belongs to the
    /// later turn.
    pub fn turn(&self, pos: f64) -> u32 {
        ((pos / self.circumference + TURN_EPSILON).floor() as u32).saturating_add(1)
    }

    /// Position within its turn of the absolute position `pos`, in
    /// `[0, circumference)`.
    pub fn pos_in_turn(&self, pos: f64) -> f64 {
        let turn = self.turn(pos);
        (pos - f64::from(turn - 1) * self.circumference).max(0.0)
    }

    // ── Storage ────────────────────────────────────────────────────

    /// Insert or replace the value at `pos` in `turn`.
    ///
    /// Grows [`n_turns`](Self::n_turns) when the sample lies beyond the
    /// current last turn.
    ///
    /// # Errors
    ///
    /// Only argument domain violations fail: a negative or non-finite
    /// position, or turn 0.
    pub fn set(&mut self, value: T, pos: f64, turn: u32) -> Result<(), FopError> {
        let abs = self.checked_total(pos, turn)?;
        self.set_total(value, abs)
    }

    /// Insert or replace the value at absolute position `pos`.
    pub fn set_total(&mut self, value: T, pos: f64) -> Result<(), FopError> {
        if !pos.is_finite() {
            return Err(FopError::NonFinitePosition { pos });
        }
        if pos < 0.0 {
            return Err(FopError::NegativePosition { pos });
        }
        self.data.insert(pos, value)?;
        let turn = self.turn(pos);
        if turn > self.n_turns {
            self.n_turns = turn;
            self.sync_period()?;
        }
        Ok(())
    }

    /// Replace the value at an existing sample.
    ///
    /// # Errors
    ///
    /// [`FopError::NoData`] if nothing is stored at exactly `(pos, turn)`.
    pub fn modify(&mut self, value: T, pos: f64, turn: u32) -> Result<(), FopError> {
        let abs = self.checked_total(pos, turn)?;
        match self.data.index_of(abs) {
            Some(i) => {
                self.data.set_value_at(i, value);
                Ok(())
            }
            None => Err(FopError::NoData { pos, turn }),
        }
    }

    /// Stored value at exactly `(pos, turn)`.
    pub fn value_at(&self, pos: f64, turn: u32) -> Option<T> {
        let abs = self.pos_total(pos, turn);
        self.data.index_of(abs).and_then(|i| self.data.value_at(i))
    }

    /// Value of the `index`-th stored sample.
    pub fn get(&self, index: usize) -> Result<T, FopError> {
        self.data.value_at(index).ok_or(FopError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Absolute position of the `index`-th stored sample.
    pub fn position(&self, index: usize) -> Result<f64, FopError> {
        self.data.position_at(index).ok_or(FopError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Overwrite the `index`-th stored sample.
    pub fn modify_at(&mut self, index: usize, value: T) -> Result<(), FopError> {
        if self.data.set_value_at(index, value) {
            Ok(())
        } else {
            Err(FopError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    /// Iterate over `(absolute position, value)` samples.
    pub fn samples(&self) -> impl Iterator<Item = (f64, T)> + '_ {
        self.data.iter()
    }

    /// Remove all samples and reset the turn count.
    pub fn clear(&mut self) {
        self.data.clear();
        self.n_turns = 0;
        debug!(circumference = self.circumference, "position function cleared");
    }

    /// Keep only the first `n_turns` turns.
    ///
    /// No-op if the function holds no more than `n_turns` turns.
    pub fn truncate_turns(&mut self, n_turns: u32) -> Result<(), FopError> {
        if n_turns == 0 {
            self.clear();
            return Ok(());
        }
        if n_turns >= self.n_turns {
            return Ok(());
        }
        self.data
            .truncate_from(f64::from(n_turns) * self.circumference);
        self.n_turns = n_turns;
        self.sync_period()
    }

    /// Metadata written with [`write_table`](Self::write_table).
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access to the metadata.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    // ── Interpolation ──────────────────────────────────────────────

    /// Build the spline explicitly.
    pub fn init(&mut self) -> Result<(), FopError> {
        Ok(self.data.init()?)
    }

    /// Whether the spline is built.
    pub fn is_ready(&self) -> bool {
        self.data.is_ready()
    }

    /// Interpolate at `pos` in `turn`, building the spline if needed.
    pub fn interp(&mut self, pos: f64, turn: u32) -> Result<T, FopError> {
        let abs = self.checked_total(pos, turn)?;
        Ok(self.data.interp(abs)?)
    }

    /// Interpolate at absolute position `pos`.
    pub fn interp_total(&mut self, pos: f64) -> Result<T, FopError> {
        Ok(self.data.interp(pos)?)
    }

    /// Interpolate at `pos` folded into range by the period.
    pub fn interp_periodic(&mut self, pos: f64) -> Result<T, FopError> {
        Ok(self.data.interp_periodic(pos)?)
    }

    /// Read-only interpolation; the spline must already be built.
    pub fn eval(&self, pos: f64, turn: u32) -> Result<T, FopError> {
        Ok(self.data.eval(self.pos_total(pos, turn))?)
    }

    /// Read-only interpolation at an absolute position.
    pub fn eval_total(&self, pos: f64) -> Result<T, FopError> {
        Ok(self.data.eval(pos)?)
    }

    // ── Combination ────────────────────────────────────────────────

    /// Whether `other` can be added to or subtracted from `self`.
    ///
    /// Both need data, equal circumference, and either equal turn counts or
    /// a single turn on `other`.
    pub fn compatible<U: Components>(&self, other: &FunctionOfPos<U>) -> bool {
        self.n_turns > 0
            && other.n_turns > 0
            && self.circumference == other.circumference
            && (self.n_turns == other.n_turns || other.n_turns == 1)
    }

    /// Add `other`, interpolated at each of `self`'s sample positions.
    ///
    /// A single-turn `other` is evaluated at the in-turn position, so its
    /// one turn applies to every turn of `self`. On error `self` is left
    /// unchanged.
    pub fn add_assign_checked(&mut self, other: &FunctionOfPos<T>) -> Result<(), FopError> {
        self.combine(other, |a, b| a + b)
    }

    /// Subtract `other`, interpolated at each of `self`'s sample positions.
    pub fn sub_assign_checked(&mut self, other: &FunctionOfPos<T>) -> Result<(), FopError> {
        self.combine(other, |a, b| a - b)
    }

    fn combine(&mut self, other: &FunctionOfPos<T>, op: impl Fn(T, T) -> T) -> Result<(), FopError> {
        if !self.compatible(other) {
            return Err(FopError::Incompatible {
                lhs_circumference: self.circumference,
                rhs_circumference: other.circumference,
                lhs_turns: self.n_turns,
                rhs_turns: other.n_turns,
            });
        }
        let rhs = other.data.evaluator()?;
        let single = other.n_turns == 1;
        let updated = self
            .data
            .iter()
            .map(|(pos, v)| {
                let at = if single { self.pos_in_turn(pos) } else { pos };
                rhs.eval(at).map(|r| op(v, r))
            })
            .collect::<Result<Vec<T>, _>>()?;
        for (i, v) in updated.into_iter().enumerate() {
            self.data.set_value_at(i, v);
        }
        Ok(())
    }

    /// Map every sample through `f` into a scalar function.
    ///
    /// Keeps circumference, spline kind, turn count and metadata.
    pub fn project(&self, f: impl Fn(&T) -> f64) -> Result<FunctionOfPos<f64>, FopError> {
        let mut out = FunctionOfPos::<f64>::new(self.circumference, self.kind())?;
        for (pos, v) in self.samples() {
            out.set_total(f(&v), pos)?;
        }
        out.metadata = self.metadata.clone();
        Ok(out)
    }

    /// Scalar projection onto component `i` of `T`.
    ///
    /// An index past the last component selects the last one.
    pub fn component(&self, i: usize) -> Result<FunctionOfPos<f64>, FopError> {
        let i = i.min(T::DIM - 1);
        self.project(|v| v.component(i))
    }

    fn checked_total(&self, pos: f64, turn: u32) -> Result<f64, FopError> {
        if turn == 0 {
            return Err(FopError::InvalidTurn { turn });
        }
        if !pos.is_finite() {
            return Err(FopError::NonFinitePosition { pos });
        }
        if pos < 0.0 {
            return Err(FopError::NegativePosition { pos });
        }
        Ok(self.pos_total(pos, turn))
    }

    fn sync_period(&mut self) -> Result<(), FopError> {
        if self.n_turns > 0 {
            self.data
                .set_period(self.circumference * f64::from(self.n_turns))?;
        }
        Ok(())
    }
}
