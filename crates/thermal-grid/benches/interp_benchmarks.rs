//! Benchmarks for grid normalization and interpolation.
//!
//! Run with: cargo bench --package thermal-grid

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ctm_common::Coordinate;
use test_utils::{axis, create_raw_grid, fill_values, LinearField, NativeNames};
use thermal_grid::{normalize, CanonicalGrid, Interpolator, ModelDescriptor, SampleSet};

/// Roughly the resolution of the southern California models.
fn model_sized_grid() -> CanonicalGrid {
    let lons = axis(-121.0, 0.05, 141);
    let lats = axis(31.0, 0.05, 121);
    let depths = axis(0.0, 1000.0, 61);
    let field = LinearField::crust();
    let values = fill_values(&lons, &lats, &depths, |x, y, z| field.at(x, y, z));
    let raw = create_raw_grid(NativeNames::SHINEVAR, &lons, &lats, &depths, values);
    normalize(&ModelDescriptor::new("Bench", "bench"), &raw).expect("normalize")
}

fn bench_point(c: &mut Criterion) {
    let grid = model_sized_grid();
    let interp = Interpolator::new(&grid);
    let mut rng = StdRng::seed_from_u64(42);
    let points: Vec<(f64, f64, f64)> = (0..1000)
        .map(|_| {
            (
                rng.gen_range(-120.9..-114.1),
                rng.gen_range(31.1..36.9),
                rng.gen_range(0.0..60_000.0),
            )
        })
        .collect();

    let mut group = c.benchmark_group("interpolation");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("point_1000", |b| {
        b.iter(|| {
            for &(x, y, z) in &points {
                let _ = black_box(interp.point(x, y, z));
            }
        })
    });

    // Cross-section sized track: 121 positions x 61 depths
    let lons: Vec<f64> = (0..121).map(|i| -120.0 + i as f64 * 0.04).collect();
    let lats: Vec<f64> = (0..121).map(|i| 32.0 + i as f64 * 0.03).collect();
    let depths: Vec<f64> = (0..61).map(|i| i as f64 * 1000.0).collect();
    let track = SampleSet::Track { lons, lats, depths };
    group.throughput(Throughput::Elements(track.len() as u64));
    group.bench_function("track_121x61", |b| b.iter(|| interp.evaluate(black_box(&track))));

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let lons = axis(-121.0, 0.05, 141);
    let lats = axis(37.0, -0.05, 121);
    let depths = axis(0.0, 1.0, 61);
    let values = fill_values(&lons, &lats, &depths, |x, y, z| x + y + z);
    let raw = create_raw_grid(NativeNames::LEE, &lons, &lats, &depths, values);
    let mut descriptor = ModelDescriptor::new("Bench", "bench");
    descriptor.temperature = "temperature_diffused".to_string();

    c.bench_function("normalize_descending_lat", |b| {
        b.iter(|| {
            let grid = normalize(&descriptor, black_box(&raw)).expect("normalize");
            black_box(grid.axis(Coordinate::Latitude).min())
        })
    });
}

criterion_group!(benches, bench_point, bench_normalize);
criterion_main!(benches);
