//! Harmonic spectrum of a scalar function of position.

use crate::error::SpectrumError;
use accring_core::Metadata;
use accring_fop::FunctionOfPos;
use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

// ── Configuration ──────────────────────────────────────────────────

/// Cutoffs applied when a [`Spectrum`] is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpectrumConfig {
    /// Highest frequency kept, in revolution harmonics. Default: no limit.
    pub max_harmonic: f64,
    /// Components with a smaller amplitude are dropped. Default: 0.
    pub amp_cut: f64,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            max_harmonic: f64::INFINITY,
            amp_cut: 0.0,
        }
    }
}

impl SpectrumConfig {
    /// Check that the amplitude cut is usable.
    pub fn validate(&self) -> Result<(), SpectrumError> {
        if !self.amp_cut.is_finite() || self.amp_cut < 0.0 {
            return Err(SpectrumError::InvalidAmpCut {
                value: self.amp_cut,
            });
        }
        Ok(())
    }
}

// ── Spectrum ───────────────────────────────────────────────────────

/// One Fourier component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Harmonic {
    /// Frequency in revolution harmonics (may be fractional for
    /// multi-turn input).
    pub freq: f64,
    /// Amplitude.
    pub amp: f64,
    /// Phase, rad.
    pub phase: f64,
}

/// Amplitudes and phases of a signal sampled over whole turns.
///
/// The input window spans `n_turns` revolutions, so FFT bin `k` is the
/// frequency `k / n_turns` in revolution harmonics. The signal is
/// reconstructed as `Σ amp · cos(2π · freq · s / C + phase)`.
#[derive(Clone, Debug)]
pub struct Spectrum {
    circumference: f64,
    n_turns: u32,
    n_samples: usize,
    config: SpectrumConfig,
    harmonics: Vec<Harmonic>,
    metadata: Metadata,
}

impl Spectrum {
    /// Transform `fop` into its spectrum.
    ///
    /// Samples that are not equidistant over `[0, C · n_turns)` are first
    /// resampled on such a grid with the same number of points. Periodic
    /// spline kinds wrap around the window; other kinds are only evaluated
    /// inside their samples, so those must reach from 0 to the last grid
    /// point.
    ///
    /// # Errors
    ///
    /// [`SpectrumError::TooFewSamples`] below two samples,
    /// [`SpectrumError::SamplesDoNotCover`] for irregular non-periodic input
    /// that does not span the grid,
    /// [`SpectrumError::InvalidAmpCut`] for a bad configuration, and any
    /// interpolation error from resampling.
    pub fn new(fop: &FunctionOfPos<f64>, config: SpectrumConfig) -> Result<Self, SpectrumError> {
        config.validate()?;
        let n = fop.len();
        if n < 2 {
            return Err(SpectrumError::TooFewSamples { found: n });
        }
        let n_turns = fop.n_turns().max(1);
        let length = fop.circumference() * f64::from(n_turns);
        let step = length / n as f64;
        let tol = 1e-9 * length;
        let equidistant = fop
            .samples()
            .enumerate()
            .all(|(j, (pos, _))| (pos - j as f64 * step).abs() <= tol);

        let values: Vec<f64> = if equidistant {
            fop.samples().map(|(_, v)| v).collect()
        } else {
            let periodic = fop.kind().is_periodic();
            if !periodic {
                let first = fop.samples().next().map_or(0.0, |(pos, _)| pos);
                let last = fop.samples().last().map_or(0.0, |(pos, _)| pos);
                let needed = (n - 1) as f64 * step;
                if first > tol || last < needed - tol {
                    return Err(SpectrumError::SamplesDoNotCover {
                        first,
                        last,
                        needed,
                    });
                }
            }
            debug!(samples = n, periodic, "resampling on an equidistant grid");
            let mut f = fop.clone();
            (0..n)
                .map(|j| {
                    let pos = j as f64 * step;
                    if periodic {
                        f.interp_periodic(pos)
                    } else {
                        f.interp_total(pos)
                    }
                })
                .collect::<Result<_, _>>()?
        };

        let mut spectrum =
            Self::from_equidistant(&values, fop.circumference(), n_turns, config)?;
        spectrum.metadata.merge(fop.metadata());
        Ok(spectrum)
    }

    /// Spectrum of `values` sampled at `j · C · n_turns / values.len()`.
    pub fn from_equidistant(
        values: &[f64],
        circumference: f64,
        n_turns: u32,
        config: SpectrumConfig,
    ) -> Result<Self, SpectrumError> {
        config.validate()?;
        let n = values.len();
        if n < 2 {
            return Err(SpectrumError::TooFewSamples { found: n });
        }
        let n_turns = n_turns.max(1);

        let mut buffer: Vec<Complex64> = values.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let scale = 1.0 / n as f64;
        let harmonics: Vec<Harmonic> = buffer[..=n / 2]
            .iter()
            .enumerate()
            .map(|(k, x)| {
                // DC and the Nyquist bin have no mirror image
                let single = k == 0 || (n % 2 == 0 && k == n / 2);
                Harmonic {
                    freq: k as f64 / f64::from(n_turns),
                    amp: x.norm() * scale * if single { 1.0 } else { 2.0 },
                    phase: x.arg(),
                }
            })
            .filter(|h| h.freq <= config.max_harmonic && h.amp >= config.amp_cut)
            .collect();

        info!(
            samples = n,
            turns = n_turns,
            kept = harmonics.len(),
            amp_cut = config.amp_cut,
            "spectrum computed"
        );
        Ok(Self {
            circumference,
            n_turns,
            n_samples: n,
            config,
            harmonics,
            metadata: Metadata::new(),
        })
    }

    /// Ring circumference, m.
    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// Number of turns in the input window.
    pub fn n_turns(&self) -> u32 {
        self.n_turns
    }

    /// Number of input samples.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Cutoffs in force.
    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Kept components, by increasing frequency.
    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    /// Number of kept components.
    pub fn len(&self) -> usize {
        self.harmonics.len()
    }

    /// `true` if every component was cut.
    pub fn is_empty(&self) -> bool {
        self.harmonics.is_empty()
    }

    /// The strongest component above zero frequency.
    pub fn dominant(&self) -> Option<&Harmonic> {
        self.harmonics
            .iter()
            .filter(|h| h.freq > 0.0)
            .max_by(|a, b| a.amp.total_cmp(&b.amp))
    }

    /// Raise the amplitude cut and drop the components below it.
    ///
    /// # Errors
    ///
    /// [`SpectrumError::CutLoosened`] for a cut below the current one;
    /// dropped components cannot be restored.
    pub fn tighten_cut(&mut self, amp_cut: f64) -> Result<(), SpectrumError> {
        SpectrumConfig {
            amp_cut,
            ..self.config
        }
        .validate()?;
        if amp_cut < self.config.amp_cut {
            return Err(SpectrumError::CutLoosened {
                current: self.config.amp_cut,
                requested: amp_cut,
            });
        }
        self.config.amp_cut = amp_cut;
        let before = self.harmonics.len();
        self.harmonics.retain(|h| h.amp >= amp_cut);
        debug!(amp_cut, dropped = before - self.harmonics.len(), "amplitude cut raised");
        Ok(())
    }

    /// Reconstruct the signal at absolute position `pos` from the kept
    /// components.
    pub fn eval(&self, pos: f64) -> f64 {
        let phase = TAU * pos / self.circumference;
        self.harmonics
            .iter()
            .map(|h| h.amp * (h.freq * phase + h.phase).cos())
            .sum()
    }

    /// Metadata written with [`write_table`](Self::write_table).
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Write the kept components as an ASCII table with a metadata header.
    pub fn write_table<W: Write>(&self, w: &mut W) -> Result<(), SpectrumError> {
        let mut header = Metadata::new()
            .with("circumference", self.circumference)
            .with("turns", self.n_turns)
            .with("samples", self.n_samples)
            .with("max harmonic", self.config.max_harmonic)
            .with("amplitude cut", self.config.amp_cut)
            .with("components", self.harmonics.len());
        header.merge(&self.metadata);
        header.write_header(w, Metadata::DELIMITER)?;
        writeln!(w, "* {:>16} {:>16} {:>16}", "freq", "amp", "phase")?;
        for h in &self.harmonics {
            writeln!(w, "  {:>16.9e} {:>16.9e} {:>16.9e}", h.freq, h.amp, h.phase)?;
        }
        Ok(())
    }

    /// Write the table to `path`.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), SpectrumError> {
        let path = path.as_ref();
        let mut w = BufWriter::new(File::create(path)?);
        self.write_table(&mut w)?;
        w.flush()?;
        debug!(path = %path.display(), "spectrum written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accring_core::{ColumnSource, Table};
    use accring_interp::SplineKind;
    use proptest::prelude::*;

    fn signal(n: usize, c: f64, f: impl Fn(f64) -> f64) -> Vec<f64> {
        (0..n).map(|j| f(j as f64 * c / n as f64)).collect()
    }

    #[test]
    fn single_cosine() {
        let c = 10.0;
        let v = signal(64, c, |s| 0.5 + 2.0 * (TAU * 3.0 * s / c + 0.3).cos());
        let s = Spectrum::from_equidistant(&v, c, 1, SpectrumConfig::default()).unwrap();
        assert_eq!(s.len(), 33);
        let h = s.dominant().unwrap();
        assert_eq!(h.freq, 3.0);
        assert!((h.amp - 2.0).abs() < 1e-12);
        assert!((h.phase - 0.3).abs() < 1e-12);
        assert!((s.harmonics()[0].amp - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cutoffs() {
        let c = 10.0;
        let v = signal(32, c, |s| (TAU * s / c).cos() + 0.1 * (TAU * 5.0 * s / c).sin());
        let cfg = SpectrumConfig {
            max_harmonic: 4.0,
            amp_cut: 1e-9,
        };
        let s = Spectrum::from_equidistant(&v, c, 1, cfg).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.harmonics()[0].freq, 1.0);

        let s = Spectrum::from_equidistant(
            &v,
            c,
            1,
            SpectrumConfig {
                amp_cut: 1e-9,
                ..SpectrumConfig::default()
            },
        )
        .unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn cut_only_tightens() {
        let c = 10.0;
        let v = signal(16, c, |s| (TAU * s / c).cos() + 0.1 * (TAU * 2.0 * s / c).cos());
        let mut s = Spectrum::from_equidistant(&v, c, 1, SpectrumConfig::default()).unwrap();
        s.tighten_cut(0.5).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(
            s.tighten_cut(0.2),
            Err(SpectrumError::CutLoosened {
                current: 0.5,
                requested: 0.2
            })
        );
        assert_eq!(s.len(), 1);
        assert_eq!(s.config().amp_cut, 0.5);
        assert!(matches!(
            s.tighten_cut(f64::NAN),
            Err(SpectrumError::InvalidAmpCut { .. })
        ));
    }

    #[test]
    fn multi_turn_frequencies_are_fractional() {
        let c = 10.0;
        // tune 0.25: one oscillation every four turns
        let v = signal(64, 4.0 * c, |s| (TAU * 0.25 * s / c).cos());
        let s = Spectrum::from_equidistant(&v, c, 4, SpectrumConfig::default()).unwrap();
        let h = s.dominant().unwrap();
        assert_eq!(h.freq, 0.25);
        assert!((h.amp - 1.0).abs() < 1e-12);
    }

    #[test]
    fn resamples_irregular_input() {
        let c = 10.0;
        let mut f = FunctionOfPos::new(c, SplineKind::CsplinePeriodic).unwrap();
        for i in 0..40 {
            // uneven spacing
            let s = c * (i as f64 + 0.3 * ((i % 3) as f64)) / 40.0;
            f.set((TAU * 2.0 * s / c).sin(), s, 1).unwrap();
        }
        let s = Spectrum::new(&f, SpectrumConfig::default()).unwrap();
        let h = s.dominant().unwrap();
        assert_eq!(h.freq, 2.0);
        assert!((h.amp - 1.0).abs() < 1e-3);
    }

    #[test]
    fn non_periodic_resampling_needs_full_coverage() {
        let c = 10.0;
        let mut late = FunctionOfPos::new(c, SplineKind::Linear).unwrap();
        for s in [1.0, 2.5, 4.0, 7.0, 9.5] {
            late.set(s, s, 1).unwrap();
        }
        assert_eq!(
            Spectrum::new(&late, SpectrumConfig::default()).map(|_| ()),
            Err(SpectrumError::SamplesDoNotCover {
                first: 1.0,
                last: 9.5,
                needed: 8.0
            })
        );

        // a ramp sampled unevenly from 0 to the last grid point
        let mut ramp = FunctionOfPos::new(c, SplineKind::Linear).unwrap();
        for s in [0.0, 1.0, 3.5, 5.0, 8.0] {
            ramp.set(s, s, 1).unwrap();
        }
        let spec = Spectrum::new(&ramp, SpectrumConfig::default()).unwrap();
        // grid 0, 2, 4, 6, 8 keeps the mean of the ramp
        assert!((spec.harmonics()[0].amp - 4.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_samples() {
        assert_eq!(
            Spectrum::from_equidistant(&[1.0], 10.0, 1, SpectrumConfig::default()).map(|_| ()),
            Err(SpectrumError::TooFewSamples { found: 1 })
        );
    }

    #[test]
    fn table_reads_back() {
        let c = 10.0;
        let v = signal(8, c, |s| (TAU * s / c).cos());
        let s = Spectrum::from_equidistant(
            &v,
            c,
            1,
            SpectrumConfig {
                amp_cut: 1e-9,
                ..SpectrumConfig::default()
            },
        )
        .unwrap();
        let mut out = Vec::new();
        s.write_table(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# circumference"));
        let t = Table::parse(&text).unwrap();
        assert_eq!(t.column("freq").unwrap(), vec![1.0]);
        assert!((t.column("amp").unwrap()[0] - 1.0).abs() < 1e-8);
    }

    proptest! {
        #[test]
        fn reconstruction_matches_samples(
            coeffs in proptest::collection::vec(-1.0f64..1.0, 1..6),
            n in 16usize..64,
        ) {
            let c = 7.0;
            let f = |s: f64| {
                coeffs
                    .iter()
                    .enumerate()
                    .map(|(k, a)| a * (TAU * k as f64 * s / c).cos())
                    .sum::<f64>()
            };
            let v = signal(n, c, f);
            let spec = Spectrum::from_equidistant(&v, c, 1, SpectrumConfig::default()).unwrap();
            for (j, x) in v.iter().enumerate() {
                let s = j as f64 * c / n as f64;
                prop_assert!((spec.eval(s) - x).abs() < 1e-9);
            }
        }
    }
}
