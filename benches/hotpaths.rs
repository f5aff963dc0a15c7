use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ledwall_calib::curvature::{CurvatureEstimator, EstimatorParams};
use ledwall_calib::geometry::GridSpec;
use ledwall_calib::{pattern, warp};

fn bench_pattern(c: &mut Criterion) {
    let grid = GridSpec::new(16, 9).unwrap();
    c.bench_function("pattern_full_1080p", |b| {
        b.iter(|| pattern::generate(black_box(1920), black_box(1080), grid, 0, 0).unwrap())
    });
}

fn bench_warp(c: &mut Criterion) {
    let grid = GridSpec::new(16, 9).unwrap();
    let image = pattern::generate(1920, 1080, grid, 0, 0).unwrap();
    c.bench_function("warp_flatten_1080p", |b| {
        b.iter(|| warp::warp_curved_to_flat(black_box(&image), 8000.0).unwrap())
    });
}

fn bench_estimate(c: &mut Criterion) {
    let cells = GridSpec::new(10, 8).unwrap();
    let image = pattern::generate(640, 480, cells, 0, 0).unwrap();
    let lattice = GridSpec::new(9, 7).unwrap();
    let estimator = CurvatureEstimator::new(EstimatorParams::default());
    c.bench_function("estimate_640x480", |b| {
        // A flat board exercises the full detect/refine/fit chain; the
        // DegenerateFit outcome is expected and ignored.
        b.iter(|| {
            let _ = estimator.estimate(black_box(&image), lattice);
        })
    });
}

criterion_group!(benches, bench_pattern, bench_warp, bench_estimate);
criterion_main!(benches);
