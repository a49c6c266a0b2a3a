//! Bulk labeling throughput: the full clip -> sub-score -> aggregate rule
//! over a batch of random samples.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use soil_scorer_rust::{ScoringConfig, SoilSample, ThresholdScorer};

fn bench_labeling(c: &mut Criterion) {
    let scorer = ThresholdScorer::new(ScoringConfig::default());
    let mut rng = StdRng::seed_from_u64(7);

    let samples: Vec<SoilSample> = (0..10_000)
        .map(|_| {
            SoilSample::new(
                rng.gen_range(0.0..200.0),
                rng.gen_range(0.0..200.0),
                if rng.gen_bool(0.9) {
                    Some(rng.gen_range(0.0..300.0))
                } else {
                    None
                },
                rng.gen_range(3.0..10.0),
            )
        })
        .collect();

    c.bench_function("label_10k_samples", |b| {
        b.iter(|| {
            for sample in &samples {
                black_box(scorer.label_sample(black_box(sample)));
            }
        })
    });
}

criterion_group!(benches, bench_labeling);
criterion_main!(benches);
