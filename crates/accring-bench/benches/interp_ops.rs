//! Criterion micro-benchmarks for spline construction and evaluation.

use accring_core::AccPair;
use accring_interp::{Interpolator, SplineKind};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::f64::consts::TAU;
use std::hint::black_box;

const PERIOD: f64 = 100.0;

fn samples(kind: SplineKind, n: usize) -> Interpolator<f64> {
    let mut s = Interpolator::with_period(kind, PERIOD).unwrap();
    for i in 0..n {
        let x = PERIOD * i as f64 / n as f64;
        s.insert(x, (TAU * 3.0 * x / PERIOD).sin()).unwrap();
    }
    s
}

/// Benchmark: build each spline kind from 10K knots.
fn bench_init_10k(c: &mut Criterion) {
    let mut group = c.benchmark_group("init_10k");
    for kind in [
        SplineKind::Linear,
        SplineKind::Cspline,
        SplineKind::CsplinePeriodic,
        SplineKind::Akima,
        SplineKind::AkimaPeriodic,
    ] {
        let base = samples(kind, 10_000);
        group.bench_with_input(BenchmarkId::from_parameter(kind.name()), &base, |b, base| {
            b.iter(|| {
                let mut s = base.clone();
                s.reset();
                s.init().unwrap();
                black_box(s.is_ready())
            });
        });
    }
    group.finish();
}

/// Benchmark: 10K periodic evaluations on a built cubic spline.
fn bench_eval_periodic_10k(c: &mut Criterion) {
    let mut s = samples(SplineKind::CsplinePeriodic, 1_000);
    s.init().unwrap();
    c.bench_function("eval_periodic_10k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..10_000 {
                let x = 3.0 * PERIOD * f64::from(i) / 10_000.0 - PERIOD;
                sum += s.eval_periodic(x).unwrap_or(0.0);
            }
            black_box(sum)
        });
    });
}

/// Benchmark: 10K evaluations of a two-component spline.
fn bench_eval_pair_10k(c: &mut Criterion) {
    let mut s = Interpolator::new(SplineKind::Akima);
    for i in 0..1_000 {
        let x = f64::from(i) * 0.1;
        s.insert(x, AccPair::new(x.sin(), x.cos())).unwrap();
    }
    s.init().unwrap();
    c.bench_function("eval_pair_10k", |b| {
        b.iter(|| {
            let mut acc = AccPair::default();
            for i in 0..10_000 {
                let x = f64::from(i) * 0.0099;
                if let Ok(v) = s.eval(x) {
                    acc = acc + v;
                }
            }
            black_box(acc)
        });
    });
}

criterion_group!(
    benches,
    bench_init_10k,
    bench_eval_periodic_10k,
    bench_eval_pair_10k,
);
criterion_main!(benches);
