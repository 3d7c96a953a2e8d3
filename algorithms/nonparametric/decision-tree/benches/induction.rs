use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use decision_tree::DecisionTree;
use learnkit_helpers::{DataPoint, Model};
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn make_data(n_rows: usize, n_features: usize) -> Vec<DataPoint<i32, f64>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    (0..n_rows)
        .map(|_| {
            let features: Array1<f64> = (0..n_features).map(|_| rng.random_range(0.0..10.0)).collect();
            // Noisy threshold on the first two features.
            let score = features[0] + features[1] + rng.random_range(-2.0..2.0);
            DataPoint::new(features, i32::from(score > 10.0))
        })
        .collect()
}

fn bench_induction(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision_tree_train");
    group.sample_size(10);

    for n_rows in [100, 300, 600] {
        let data = make_data(n_rows, 8);
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &data, |b, data| {
            b.iter(|| {
                let mut tree = DecisionTree::new();
                tree.train(black_box(data)).unwrap();
                tree
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_induction);
criterion_main!(benches);
