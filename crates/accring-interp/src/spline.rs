//! One-dimensional spline kernels.
//!
//! The kernels come from external crates: [`splines`] for the linear kind
//! and [`peroxide`] for the natural cubic and Akima kinds. Periodic kinds
//! are built from the same kernels over a periodic extension of the knots.
//! Periodic input must be closed: the last knot is the first one shifted
//! by one period and carries the same value.

use crate::error::InterpError;
use peroxide::numerical::spline::{
    cubic_hermite_spline, cubic_spline, CubicHermiteSpline, CubicSpline, SlopeMethod,
    Spline as _,
};
use splines::{Interpolation, Key};
use std::fmt;

/// Wrapped knots added on each side of one period before a periodic build.
///
/// Akima tangents only look two segments to either side, so the periodic
/// Akima kernel is exact. The natural end conditions of the cubic kernel
/// decay by a factor of about `2 - √3` per knot and are negligible here.
const PERIODIC_PAD: usize = 24;

/// Spline family used by an [`Interpolator`](crate::Interpolator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplineKind {
    /// Piecewise linear.
    Linear,
    /// Natural cubic spline (zero curvature at both ends).
    Cspline,
    /// Cubic spline with periodic boundary conditions.
    CsplinePeriodic,
    /// Akima spline (robust against outliers, no global coupling).
    Akima,
    /// Akima spline with periodic boundary conditions.
    AkimaPeriodic,
}

impl SplineKind {
    /// Whether the kind wraps around a period.
    pub fn is_periodic(self) -> bool {
        matches!(self, Self::CsplinePeriodic | Self::AkimaPeriodic)
    }

    /// Minimum number of real samples required to build the spline.
    pub fn min_points(self) -> usize {
        match self {
            Self::Linear | Self::CsplinePeriodic => 2,
            Self::Cspline => 3,
            Self::Akima | Self::AkimaPeriodic => 5,
        }
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Cspline => "cspline",
            Self::CsplinePeriodic => "cspline_periodic",
            Self::Akima => "akima",
            Self::AkimaPeriodic => "akima_periodic",
        }
    }
}

impl fmt::Display for SplineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built kernel for one scalar component.
#[derive(Clone, Debug)]
pub(crate) enum Spline {
    Linear(splines::Spline<f64, f64>),
    Cubic(CubicSpline),
    Hermite(CubicHermiteSpline),
}

impl Spline {
    /// Build a kernel over `x` (strictly increasing, at least 2 knots).
    pub(crate) fn build(kind: SplineKind, x: &[f64], y: &[f64]) -> Result<Self, InterpError> {
        debug_assert!(x.len() >= 2 && x.len() == y.len());
        let kernel_error = kernel_error(kind);
        Ok(match kind {
            SplineKind::Linear => Self::Linear(splines::Spline::from_vec(
                x.iter()
                    .zip(y)
                    .map(|(&t, &v)| Key::new(t, v, Interpolation::Linear))
                    .collect(),
            )),
            SplineKind::Cspline => Self::Cubic(cubic_spline(x, y).map_err(kernel_error)?),
            SplineKind::CsplinePeriodic => {
                let (xe, ye) = periodic_extension(x, y, PERIODIC_PAD);
                Self::Cubic(cubic_spline(&xe, &ye).map_err(kernel_error)?)
            }
            SplineKind::Akima => Self::Hermite(
                cubic_hermite_spline(x, y, SlopeMethod::Akima).map_err(kernel_error)?,
            ),
            SplineKind::AkimaPeriodic => {
                let (xe, ye) = periodic_extension(x, y, PERIODIC_PAD);
                Self::Hermite(
                    cubic_hermite_spline(&xe, &ye, SlopeMethod::Akima).map_err(kernel_error)?,
                )
            }
        })
    }

    /// Evaluate at `xq`. Range checks are the caller's job.
    pub(crate) fn eval(&self, xq: f64) -> f64 {
        match self {
            Self::Linear(s) => s.clamped_sample(xq).unwrap_or(f64::NAN),
            Self::Cubic(s) => s.eval(xq),
            Self::Hermite(s) => s.eval(xq),
        }
    }
}

fn kernel_error<E: fmt::Display>(kind: SplineKind) -> impl Fn(E) -> InterpError {
    move |e| InterpError::Kernel {
        kind,
        reason: e.to_string(),
    }
}

/// Repeat one closed period `pad` knots beyond each end.
fn periodic_extension(x: &[f64], y: &[f64], pad: usize) -> (Vec<f64>, Vec<f64>) {
    let m = (x.len() - 1) as isize;
    let period = x[x.len() - 1] - x[0];
    let pad = pad as isize;
    (-pad..=m + pad)
        .map(|j| {
            let i = j.rem_euclid(m) as usize;
            (x[i] + j.div_euclid(m) as f64 * period, y[i])
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn build(kind: SplineKind, x: &[f64], y: &[f64]) -> Spline {
        Spline::build(kind, x, y).unwrap()
    }

    #[test]
    fn linear_hits_knots_and_midpoints() {
        let s = build(SplineKind::Linear, &[0.0, 1.0, 3.0], &[0.0, 2.0, 0.0]);
        assert!(close(s.eval(0.5), 1.0, 1e-12));
        assert!(close(s.eval(2.0), 1.0, 1e-12));
        assert!(close(s.eval(3.0), 0.0, 1e-12));
    }

    #[test]
    fn natural_cubic_reproduces_straight_line() {
        let x = [0.0, 1.0, 2.5, 4.0, 7.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let s = build(SplineKind::Cspline, &x, &y);
        for q in [0.3, 1.7, 3.3, 6.9, 7.0] {
            assert!(close(s.eval(q), 2.0 * q - 1.0, 1e-9));
        }
    }

    #[test]
    fn akima_reproduces_straight_line() {
        let x = [0.0, 1.0, 2.0, 3.5, 5.0, 6.0];
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v + 3.0).collect();
        let s = build(SplineKind::Akima, &x, &y);
        for q in [0.1, 2.2, 4.9, 5.5] {
            assert!(close(s.eval(q), 0.5 * q + 3.0, 1e-9));
        }
    }

    #[test]
    fn extension_repeats_the_period() {
        let (x, y) = periodic_extension(&[2.0, 8.0, 12.0], &[1.0, 2.0, 1.0], 3);
        assert_eq!(x, vec![-12.0, -8.0, -2.0, 2.0, 8.0, 12.0, 18.0, 22.0, 28.0]);
        assert_eq!(y, vec![2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn periodic_cubic_two_samples() {
        // Samples at 2 and 8 with period 10, closed at 12.
        let s = build(SplineKind::CsplinePeriodic, &[2.0, 8.0, 12.0], &[1.0, 2.0, 1.0]);
        assert!(close(s.eval(5.0), 1.5, 1e-9));
        assert!(close(s.eval(8.0), 2.0, 1e-12));
        assert!(close(s.eval(12.0), 1.0, 1e-12));
    }

    #[test]
    fn periodic_cubic_matches_sine() {
        let n = 32;
        let x: Vec<f64> = (0..=n).map(|i| i as f64 / n as f64).collect();
        let mut y: Vec<f64> = x.iter().map(|v| (TAU * v).sin()).collect();
        y[n] = y[0];
        let s = build(SplineKind::CsplinePeriodic, &x, &y);
        for q in [0.01, 0.33, 0.5, 0.77, 0.99] {
            assert!(close(s.eval(q), (TAU * q).sin(), 1e-4));
        }
    }

    #[test]
    fn periodic_cubic_slope_continuous_at_wrap() {
        let x = [0.0, 0.3, 0.5, 0.9, 1.0];
        let y = [1.0, 0.2, -0.4, 0.7, 1.0];
        let s = build(SplineKind::CsplinePeriodic, &x, &y);
        let eps = 1e-6;
        let left = (s.eval(1.0) - s.eval(1.0 - eps)) / eps;
        let right = (s.eval(eps) - s.eval(0.0)) / eps;
        assert!(close(left, right, 1e-3));
    }

    #[test]
    fn akima_periodic_matches_cosine() {
        let n = 40;
        let x: Vec<f64> = (0..=n).map(|i| i as f64 * 0.25).collect();
        let period = n as f64 * 0.25;
        let mut y: Vec<f64> = x.iter().map(|v| (TAU * v / period).cos()).collect();
        y[n] = y[0];
        let s = build(SplineKind::AkimaPeriodic, &x, &y);
        for q in [0.1, 3.3, 7.7, 9.9] {
            assert!(close(s.eval(q), (TAU * q / period).cos(), 1e-3));
        }
    }

    #[test]
    fn akima_periodic_same_on_both_sides_of_the_wrap() {
        let x = [0.0, 0.2, 0.45, 0.6, 0.8, 1.0];
        let y = [0.0, 1.0, 0.5, -1.0, 0.3, 0.0];
        let s = build(SplineKind::AkimaPeriodic, &x, &y);
        for q in [0.05, 0.3, 0.7, 0.95] {
            assert!(close(s.eval(q), s.eval(q + 1.0), 1e-9));
        }
    }
}
