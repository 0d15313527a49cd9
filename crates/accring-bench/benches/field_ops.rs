//! Criterion benchmarks for field sampling and spectra.

use accring_bench::{betatron_orbit, reference_ring};
use accring_field::{Field, Spectrum, SpectrumConfig};
use accring_interp::SplineKind;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Benchmark: design-orbit field of the reference ring, 4096 samples.
fn bench_field_design(c: &mut Criterion) {
    let ring = reference_ring();
    let mut field = Field::new(ring.circumference(), SplineKind::Linear).unwrap();
    c.bench_function("field_design_4096", |b| {
        b.iter(|| {
            field.set_design(&ring, 4096, false).unwrap();
            black_box(field.function().len())
        });
    });
}

/// Benchmark: edge-blended field along a 10-turn betatron orbit.
fn bench_field_orbit_edges(c: &mut Criterion) {
    let ring = reference_ring();
    let orbit = betatron_orbit(ring.circumference(), 4.3, 1e-3, 512, 10);
    let mut field = Field::new(ring.circumference(), SplineKind::Linear).unwrap();
    c.bench_function("field_orbit_edges_10turns", |b| {
        b.iter(|| {
            field.set(&ring, &orbit, 1024, true).unwrap();
            black_box(field.function().len())
        });
    });
}

/// Benchmark: vertical-field spectrum of 16384 equidistant samples.
fn bench_spectrum_16k(c: &mut Criterion) {
    let ring = reference_ring();
    let mut field = Field::new(ring.circumference(), SplineKind::Linear).unwrap();
    field.set_design(&ring, 16_384, false).unwrap();
    let bz = field.function().component(1).unwrap();
    let config = SpectrumConfig {
        max_harmonic: 500.0,
        amp_cut: 1e-6,
    };
    c.bench_function("spectrum_16k", |b| {
        b.iter(|| black_box(Spectrum::new(&bz, config).unwrap().len()));
    });
}

criterion_group!(
    benches,
    bench_field_design,
    bench_field_orbit_edges,
    bench_spectrum_16k,
);
criterion_main!(benches);
