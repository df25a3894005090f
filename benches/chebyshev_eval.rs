use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dephem::jpl_ephem::horizon::chebyshev::{evaluate, ChebyshevBasis};

/// Coefficient count of the DE405 Mercury series, the longest of the file.
const MERCURY_TERMS: usize = 14;

fn random_cases(rng: &mut StdRng, samples: usize) -> Vec<(Vec<f64>, f64)> {
    (0..samples)
        .map(|_| {
            let coeffs = (0..MERCURY_TERMS)
                .map(|k| rng.random_range(-1.0..1.0) * 1e5 / 10f64.powi(k as i32))
                .collect();
            (coeffs, rng.random_range(-1.0..=1.0))
        })
        .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDE405);
    let samples = 10_000usize;

    c.bench_function("chebyshev/evaluate_value", |b| {
        b.iter_batched(
            || random_cases(&mut rng, samples),
            |cases| {
                for (coeffs, t) in &cases {
                    black_box(evaluate(black_box(coeffs), black_box(*t), false));
                }
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("chebyshev/evaluate_value_and_rate", |b| {
        b.iter_batched(
            || random_cases(&mut rng, samples),
            |cases| {
                for (coeffs, t) in &cases {
                    black_box(evaluate(black_box(coeffs), black_box(*t), true));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// One basis shared by the three components of a vector target.
fn bench_shared_basis(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC4EB);
    let samples = 10_000usize;

    c.bench_function("chebyshev/basis_three_components", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        let t = rng.random_range(-1.0..=1.0);
                        let coeffs: Vec<f64> = (0..3 * MERCURY_TERMS).map(|_| rng.random::<f64>()).collect();
                        (coeffs, t)
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (coeffs, t) in &cases {
                    let basis = ChebyshevBasis::new(*t, MERCURY_TERMS, true);
                    for component in coeffs.chunks_exact(MERCURY_TERMS) {
                        black_box(basis.value(component));
                        black_box(basis.derivative(component));
                    }
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_evaluate, bench_shared_basis);
criterion_main!(benches);
