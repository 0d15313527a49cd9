//! Sample storage with a lazily built spline.

use crate::error::InterpError;
use crate::spline::{Spline, SplineKind};
use accring_core::Components;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// Relative tolerance for deciding that the last sample already closes the
/// period.
const CLOSURE_TOLERANCE: f64 = 1e-9;

/// Sorted samples of `T` plus an optional built spline.
///
/// # Lifecycle
///
/// A fresh or modified interpolator is *not ready*. [`init`](Self::init)
/// builds the spline; [`interp`](Self::interp) does so lazily on first use.
/// Read-only evaluation through [`eval`](Self::eval) never builds and fails
/// with [`InterpError::NotInitialized`] instead. Every mutation of the
/// samples drops the built spline.
///
/// # Periodic kinds
///
/// For [`SplineKind::CsplinePeriodic`] and [`SplineKind::AkimaPeriodic`]
/// the samples are treated as one period of a periodic function. Two
/// images of the boundary samples, at `x_last - period` and
/// `x_first + period`, take part in the build so the wrap point is
/// interpolated rather than extrapolated. They are never stored as samples.
/// The interpolation range is `[x_last - period, x_first + period]`.
///
/// # Examples
///
/// ```
/// use accring_interp::{Interpolator, SplineKind};
///
/// let mut f = Interpolator::<f64>::new(SplineKind::Linear);
/// f.insert(0.0, 0.0).unwrap();
/// f.insert(2.0, 4.0).unwrap();
/// assert_eq!(f.interp(0.5).unwrap(), 1.0);
/// assert!(f.interp(3.0).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Interpolator<T: Components> {
    kind: SplineKind,
    period: Option<f64>,
    x: Vec<f64>,
    y: Vec<T>,
    built: Option<SplineSet<T>>,
}

impl<T: Components> Interpolator<T> {
    /// Create an empty interpolator.
    pub fn new(kind: SplineKind) -> Self {
        Self {
            kind,
            period: None,
            x: Vec::new(),
            y: Vec::new(),
            built: None,
        }
    }

    /// Create an empty interpolator with a fixed period.
    pub fn with_period(kind: SplineKind, period: f64) -> Result<Self, InterpError> {
        let mut s = Self::new(kind);
        s.set_period(period)?;
        Ok(s)
    }

    /// Spline kind.
    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    /// Whether the spline kind is periodic.
    pub fn is_periodic(&self) -> bool {
        self.kind.is_periodic()
    }

    /// Configured period, if any.
    pub fn period(&self) -> Option<f64> {
        self.period
    }

    /// Set the period. Drops the built spline.
    pub fn set_period(&mut self, period: f64) -> Result<(), InterpError> {
        if !period.is_finite() || period <= 0.0 {
            return Err(InterpError::InvalidPeriod {
                period,
                span: self.span(),
            });
        }
        self.period = Some(period);
        self.built = None;
        Ok(())
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `true` if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Sample positions, ascending.
    pub fn positions(&self) -> &[f64] {
        &self.x
    }

    /// Sample values, in position order.
    pub fn values(&self) -> &[T] {
        &self.y
    }

    /// Iterate over `(position, value)` samples.
    pub fn iter(&self) -> impl Iterator<Item = (f64, T)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Distance between the first and last sample (0 if fewer than 2).
    pub fn span(&self) -> f64 {
        match (self.x.first(), self.x.last()) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    /// Index of the sample stored exactly at `x`.
    pub fn index_of(&self, x: f64) -> Option<usize> {
        self.x.binary_search_by(|k| k.total_cmp(&x)).ok()
    }

    /// Insert a sample, replacing any sample at exactly the same position.
    ///
    /// Returns the replaced value.
    pub fn insert(&mut self, x: f64, value: T) -> Result<Option<T>, InterpError> {
        if !x.is_finite() {
            return Err(InterpError::NonFinite { x });
        }
        self.built = None;
        match self.x.binary_search_by(|k| k.total_cmp(&x)) {
            Ok(i) => Ok(Some(std::mem::replace(&mut self.y[i], value))),
            Err(i) => {
                self.x.insert(i, x);
                self.y.insert(i, value);
                Ok(None)
            }
        }
    }

    /// Value of the `index`-th sample.
    pub fn value_at(&self, index: usize) -> Option<T> {
        self.y.get(index).copied()
    }

    /// Position of the `index`-th sample.
    pub fn position_at(&self, index: usize) -> Option<f64> {
        self.x.get(index).copied()
    }

    /// Overwrite the `index`-th sample value. Returns `false` if out of range.
    pub fn set_value_at(&mut self, index: usize, value: T) -> bool {
        match self.y.get_mut(index) {
            Some(slot) => {
                *slot = value;
                self.built = None;
                true
            }
            None => false,
        }
    }

    /// Remove every sample at or beyond `x`.
    pub fn truncate_from(&mut self, x: f64) {
        let keep = self.x.partition_point(|&k| k < x);
        if keep < self.x.len() {
            self.x.truncate(keep);
            self.y.truncate(keep);
            self.built = None;
        }
    }

    /// Remove all samples.
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.built = None;
    }

    /// Whether the spline is built.
    pub fn is_ready(&self) -> bool {
        self.built.is_some()
    }

    /// Drop the built spline without touching samples.
    pub fn reset(&mut self) {
        self.built = None;
    }

    /// Build the spline.
    ///
    /// Calling `init` on a ready interpolator is a no-op.
    ///
    /// # Errors
    ///
    /// [`InterpError::TooFewPoints`] below [`SplineKind::min_points`],
    /// [`InterpError::InvalidPeriod`] if the period is shorter than the data.
    pub fn init(&mut self) -> Result<(), InterpError> {
        if self.built.is_some() {
            debug!(kind = %self.kind, "interpolation already initialized");
            return Ok(());
        }
        self.built = Some(self.build()?);
        Ok(())
    }

    /// Interpolate at `x`, building the spline first if needed.
    pub fn interp(&mut self, x: f64) -> Result<T, InterpError> {
        self.init()?;
        self.eval(x)
    }

    /// Interpolate at `x` after folding it into range by the period.
    pub fn interp_periodic(&mut self, x: f64) -> Result<T, InterpError> {
        self.init()?;
        self.eval_periodic(x)
    }

    /// Read-only interpolation; requires a ready spline.
    pub fn eval(&self, x: f64) -> Result<T, InterpError> {
        self.built
            .as_ref()
            .ok_or(InterpError::NotInitialized)?
            .eval(x)
    }

    /// Read-only periodic interpolation; requires a ready spline.
    pub fn eval_periodic(&self, x: f64) -> Result<T, InterpError> {
        self.built
            .as_ref()
            .ok_or(InterpError::NotInitialized)?
            .eval_periodic(x)
    }

    /// The built spline, or a freshly built one if not ready.
    ///
    /// This is the one read-only path that may build: it exists for callers
    /// that combine two sample sets and only hold a shared borrow of the
    /// second, such as `FunctionOfPos::add_assign_checked`. The temporary
    /// spline is dropped with the returned value, so `self` stays not
    /// ready and [`eval`](Self::eval) keeps failing with
    /// [`InterpError::NotInitialized`]. Anything that can take `&mut self`
    /// should use [`init`](Self::init) or [`interp`](Self::interp) instead.
    pub fn evaluator(&self) -> Result<Cow<'_, SplineSet<T>>, InterpError> {
        match &self.built {
            Some(s) => Ok(Cow::Borrowed(s)),
            None => Ok(Cow::Owned(self.build()?)),
        }
    }

    /// Interpolation range `(min, max)` for the current samples.
    ///
    /// `None` if no samples are stored.
    pub fn range(&self) -> Option<(f64, f64)> {
        let (first, last) = (*self.x.first()?, *self.x.last()?);
        if self.is_periodic() {
            let p = self.period.unwrap_or(last - first);
            Some((last - p, first + p))
        } else {
            Some((first, last))
        }
    }

    fn build(&self) -> Result<SplineSet<T>, InterpError> {
        let n = self.x.len();
        let needed = self.kind.min_points();
        if n < needed {
            return Err(InterpError::TooFewPoints {
                kind: self.kind,
                found: n,
                needed,
            });
        }
        let span = self.span();
        if span <= 0.0 {
            return Err(InterpError::InvalidPeriod { period: 0.0, span });
        }

        if !self.is_periodic() {
            let splines = (0..T::DIM)
                .map(|c| {
                    let y: Vec<f64> = self.y.iter().map(|v| v.component(c)).collect();
                    Spline::build(self.kind, &self.x, &y)
                })
                .collect::<Result<_, _>>()?;
            return Ok(SplineSet {
                splines,
                min: self.x[0],
                max: self.x[n - 1],
                first: self.x[0],
                period: None,
                fold: self.period.unwrap_or(span),
                _value: PhantomData,
            });
        }

        let period = match self.period {
            Some(p) => p,
            None => {
                info!(span, kind = %self.kind, "no period set, using sampled span");
                span
            }
        };
        let tol = CLOSURE_TOLERANCE * period.max(1.0);
        if period < span - tol {
            return Err(InterpError::InvalidPeriod { period, span });
        }

        let closed = (self.x[0] + period - self.x[n - 1]).abs() <= tol;
        let mut knots = self.x.clone();
        if !closed {
            knots.push(self.x[0] + period);
        }
        if closed && self.y[n - 1] != self.y[0] {
            warn!(
                first = ?self.y[0],
                last = ?self.y[n - 1],
                "periodic data closes the period with a different value, using the first"
            );
        }

        let splines = (0..T::DIM)
            .map(|c| {
                let mut y: Vec<f64> = self.y.iter().map(|v| v.component(c)).collect();
                if closed {
                    y[n - 1] = y[0];
                } else {
                    y.push(y[0]);
                }
                Spline::build(self.kind, &knots, &y)
            })
            .collect::<Result<_, _>>()?;

        Ok(SplineSet {
            splines,
            min: self.x[n - 1] - period,
            max: self.x[0] + period,
            first: self.x[0],
            period: Some(period),
            fold: period,
            _value: PhantomData,
        })
    }
}

/// A built spline: one kernel per component of `T` and its valid range.
#[derive(Clone, Debug)]
pub struct SplineSet<T> {
    splines: SmallVec<[Spline; 3]>,
    min: f64,
    max: f64,
    first: f64,
    period: Option<f64>,
    fold: f64,
    _value: PhantomData<T>,
}

impl<T: Components> SplineSet<T> {
    /// Lower bound of the interpolation range.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the interpolation range.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Evaluate at `x`.
    ///
    /// # Errors
    ///
    /// [`InterpError::OutOfRange`] outside `[min, max]`; the spline is never
    /// extrapolated.
    pub fn eval(&self, x: f64) -> Result<T, InterpError> {
        if !x.is_finite() {
            return Err(InterpError::NonFinite { x });
        }
        if x < self.min || x > self.max {
            return Err(InterpError::OutOfRange {
                x,
                min: self.min,
                max: self.max,
            });
        }
        let q = match self.period {
            Some(p) if x < self.first => x + p,
            _ => x,
        };
        let mut c = [0.0f64; 3];
        for (i, spline) in self.splines.iter().enumerate() {
            let v = spline.eval(q);
            c[i] = if v.is_nan() {
                warn!(x, component = i, "interpolation returned NaN, using 0");
                0.0
            } else {
                v
            };
        }
        Ok(T::from_components(&c[..T::DIM]))
    }

    /// Fold `x` into `[min, min + fold)` and evaluate.
    ///
    /// `fold` is the period for periodic kinds, otherwise the configured
    /// period or the sampled span.
    pub fn eval_periodic(&self, x: f64) -> Result<T, InterpError> {
        if !x.is_finite() {
            return Err(InterpError::NonFinite { x });
        }
        let folded = self.min + (x - self.min).rem_euclid(self.fold);
        self.eval(folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accring_core::{AccPair, AccTriple};
    use proptest::prelude::*;
    use std::f64::consts::TAU;

    fn periodic_sine(n: usize, period: f64) -> Interpolator<f64> {
        let mut f = Interpolator::with_period(SplineKind::CsplinePeriodic, period).unwrap();
        for i in 0..n {
            let x = i as f64 * period / n as f64;
            f.insert(x, (TAU * x / period).sin()).unwrap();
        }
        f
    }

    #[test]
    fn lazy_init_on_mutable_path() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        f.insert(0.0, 1.0).unwrap();
        f.insert(1.0, 3.0).unwrap();
        assert!(!f.is_ready());
        assert_eq!(f.interp(0.5).unwrap(), 2.0);
        assert!(f.is_ready());
    }

    #[test]
    fn read_only_eval_requires_init() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        f.insert(0.0, 1.0).unwrap();
        f.insert(1.0, 3.0).unwrap();
        assert_eq!(f.eval(0.5), Err(InterpError::NotInitialized));
        f.init().unwrap();
        assert_eq!(f.eval(0.5).unwrap(), 2.0);
    }

    #[test]
    fn second_init_is_noop() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        f.insert(0.0, 1.0).unwrap();
        f.insert(1.0, 3.0).unwrap();
        f.init().unwrap();
        f.init().unwrap();
        assert!(f.is_ready());
    }

    #[test]
    fn mutation_drops_spline() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        f.insert(0.0, 1.0).unwrap();
        f.insert(1.0, 3.0).unwrap();
        f.init().unwrap();
        f.insert(2.0, 0.0).unwrap();
        assert!(!f.is_ready());
        assert_eq!(f.eval(0.5), Err(InterpError::NotInitialized));
    }

    #[test]
    fn too_few_points() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        f.insert(0.0, 1.0).unwrap();
        assert_eq!(
            f.init(),
            Err(InterpError::TooFewPoints {
                kind: SplineKind::Linear,
                found: 1,
                needed: 2
            })
        );
        let mut a = Interpolator::<f64>::new(SplineKind::Akima);
        for i in 0..4 {
            a.insert(i as f64, 0.0).unwrap();
        }
        assert!(matches!(a.init(), Err(InterpError::TooFewPoints { needed: 5, .. })));
    }

    #[test]
    fn non_periodic_never_extrapolates() {
        let mut f = Interpolator::<f64>::new(SplineKind::Cspline);
        for i in 0..5 {
            f.insert(i as f64, i as f64).unwrap();
        }
        assert_eq!(f.range(), Some((0.0, 4.0)));
        assert!(matches!(f.interp(4.1), Err(InterpError::OutOfRange { .. })));
        assert!(matches!(f.interp(-0.1), Err(InterpError::OutOfRange { .. })));
        assert!(f.interp(4.0).is_ok());
    }

    #[test]
    fn periodic_range_uses_period() {
        let mut f = Interpolator::<f64>::with_period(SplineKind::CsplinePeriodic, 10.0).unwrap();
        f.insert(2.0, 1.0).unwrap();
        f.insert(8.0, 2.0).unwrap();
        assert_eq!(f.range(), Some((-2.0, 12.0)));
        let mid = f.interp(5.0).unwrap();
        assert!(mid > 1.0 && mid < 2.0);
        assert!((f.interp(10.0).unwrap() - f.interp(0.0).unwrap()).abs() < 1e-12);
        assert!((f.interp(-2.0).unwrap() - f.interp(8.0).unwrap()).abs() < 1e-12);
        assert!((f.interp(12.0).unwrap() - f.interp(2.0).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn synthetic_boundary_samples_not_stored() {
        let mut f = periodic_sine(8, 1.0);
        f.init().unwrap();
        assert_eq!(f.len(), 8);
        assert!(f.positions().iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn default_period_is_span() {
        let mut f = Interpolator::<f64>::new(SplineKind::CsplinePeriodic);
        f.insert(0.0, 0.0).unwrap();
        f.insert(0.5, 1.0).unwrap();
        f.insert(1.0, 0.0).unwrap();
        f.init().unwrap();
        let s = f.evaluator().unwrap();
        assert_eq!((s.min(), s.max()), (0.0, 1.0));
    }

    #[test]
    fn period_shorter_than_data_rejected() {
        let mut f = Interpolator::<f64>::with_period(SplineKind::CsplinePeriodic, 1.0).unwrap();
        f.insert(0.0, 0.0).unwrap();
        f.insert(2.0, 0.0).unwrap();
        assert!(matches!(f.init(), Err(InterpError::InvalidPeriod { .. })));
    }

    #[test]
    fn vector_values_interpolate_per_component() {
        let mut f = Interpolator::<AccTriple>::new(SplineKind::Linear);
        f.insert(0.0, AccTriple::new(0.0, 1.0, 2.0)).unwrap();
        f.insert(2.0, AccTriple::new(2.0, 3.0, 6.0)).unwrap();
        assert_eq!(f.interp(1.0).unwrap(), AccTriple::new(1.0, 2.0, 4.0));

        let mut g = Interpolator::<AccPair>::new(SplineKind::Linear);
        g.insert(0.0, AccPair::new(1.0, -1.0)).unwrap();
        g.insert(1.0, AccPair::new(3.0, 1.0)).unwrap();
        assert_eq!(g.interp(0.5).unwrap(), AccPair::new(2.0, 0.0));
    }

    #[test]
    fn insert_replaces_same_position() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        assert_eq!(f.insert(1.0, 5.0).unwrap(), None);
        assert_eq!(f.insert(1.0, 6.0).unwrap(), Some(5.0));
        assert_eq!(f.len(), 1);
        assert!(matches!(f.insert(f64::NAN, 0.0), Err(InterpError::NonFinite { .. })));
    }

    #[test]
    fn evaluator_does_not_mutate() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        f.insert(0.0, 0.0).unwrap();
        f.insert(1.0, 1.0).unwrap();
        let v = f.evaluator().unwrap().eval(0.25).unwrap();
        assert_eq!(v, 0.25);
        assert!(!f.is_ready());
        assert_eq!(f.eval(0.25), Err(InterpError::NotInitialized));
    }

    #[test]
    fn truncate_from_removes_tail() {
        let mut f = Interpolator::<f64>::new(SplineKind::Linear);
        for i in 0..10 {
            f.insert(i as f64, 0.0).unwrap();
        }
        f.truncate_from(5.0);
        assert_eq!(f.len(), 5);
        assert_eq!(f.positions().last(), Some(&4.0));
    }

    proptest! {
        #[test]
        fn periodic_fold_never_out_of_range(x in -1.0e4f64..1.0e4) {
            let mut f = periodic_sine(16, 2.5);
            let folded = f.interp_periodic(x);
            prop_assert!(folded.is_ok());
            let reduced = x.rem_euclid(2.5);
            let direct = f.interp(reduced).unwrap();
            prop_assert!((folded.unwrap() - direct).abs() < 1e-6);
        }

        #[test]
        fn periodic_sine_accuracy(x in 0.0f64..1.0) {
            let mut f = periodic_sine(64, 1.0);
            let v = f.interp(x).unwrap();
            prop_assert!((v - (TAU * x).sin()).abs() < 1e-5);
        }
    }
}
