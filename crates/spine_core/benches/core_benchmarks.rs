//! Criterion benchmarks for spine_core interpolation methods.
//!
//! Measures evaluation and gradient accumulation across knot counts to
//! characterise scaling behaviour of the method families.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use spine_core::interpolation::{interpolation_from_name, Interpolation, INTERPOLATION_NAMES};
use spine_core::knots::{KnotPoint, KnotPoints, SharedKnots};
use spine_core::window::CurveWindow;

/// Build a knot set of `n` unknown knots on a rate-like curve shape.
fn generate_knots(n: usize) -> SharedKnots {
    let knots = KnotPoints::new_shared();
    for i in 0..n {
        let x = 0.25 + i as f64 * 0.5;
        let y = 0.02 + 0.01 * (x / 10.0).tanh();
        knots
            .borrow_mut()
            .add(KnotPoint::unknown(x, y))
            .unwrap_or_else(|_| unreachable!("distinct x by construction"));
    }
    knots
}

fn prepared_method(name: &str, knots: &SharedKnots) -> Box<dyn Interpolation> {
    let mut method = interpolation_from_name(name).unwrap();
    method.set_window(CurveWindow::full(knots.clone())).unwrap();
    method.update().unwrap();
    method
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for size in [10, 50, 200] {
        let knots = generate_knots(size);
        let x_mid = 0.25 + size as f64 * 0.25;

        for name in ["StraightLine", "MonotoneConvexSpline", "BiQuadratic"] {
            let method = prepared_method(name, &knots);
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &method,
                |b, m| {
                    b.iter(|| m.evaluate(black_box(x_mid)));
                },
            );
        }
    }

    group.finish();
}

fn bench_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate_gradient");

    for size in [10, 50, 200] {
        let knots = generate_knots(size);
        let x_mid = 0.25 + size as f64 * 0.25;

        for name in ["StraightLine", "MonotoneConvexSpline", "BiQuadratic"] {
            let method = prepared_method(name, &knots);
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &method,
                |b, m| {
                    let mut gradient = vec![0.0; size];
                    b.iter(|| {
                        m.accumulate_gradient(black_box(x_mid), 1.0, &mut gradient);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_window_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_window");

    for size in [10, 50, 200] {
        let knots = generate_knots(size);

        for name in INTERPOLATION_NAMES.iter().filter(|n| **n != "CubicSpline") {
            group.bench_with_input(
                BenchmarkId::new(*name, size),
                &knots,
                |b, knots| {
                    b.iter(|| {
                        let mut method = interpolation_from_name(name).unwrap();
                        method
                            .set_window(CurveWindow::full(black_box(knots.clone())))
                            .unwrap();
                        method.update().unwrap();
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_gradient, bench_window_setup);
criterion_main!(benches);
