use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use explainboard::dataset::Dataset;
use explainboard::explain::ShapExplainer;
use explainboard::training::RandomForest;

fn bench_explain(c: &mut Criterion) {
    let dataset = Dataset::iris().unwrap();
    let x = dataset.features().unwrap();
    let y = dataset.targets().unwrap();

    let mut forest = RandomForest::new(25).with_random_state(42);
    forest.fit(&x, &y).unwrap();

    let mut group = c.benchmark_group("explain");
    group.sample_size(10); // each iteration explains the full table

    for n_samples in [4, 16, 64].iter() {
        group.bench_with_input(
            BenchmarkId::new("iris", n_samples),
            n_samples,
            |b, &n_samples| {
                b.iter(|| {
                    let explainer = ShapExplainer::new(&forest, &x)
                        .with_n_samples(n_samples)
                        .with_seed(42);
                    explainer.explain(black_box(&x)).unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let dataset = Dataset::iris().unwrap();
    let x = dataset.features().unwrap();
    let y = dataset.targets().unwrap();

    c.bench_function("train_forest_iris", |b| {
        b.iter(|| {
            let mut forest = RandomForest::new(50).with_random_state(42);
            forest.fit(black_box(&x), black_box(&y)).unwrap();
            black_box(forest)
        })
    });
}

criterion_group!(benches, bench_explain, bench_training);
criterion_main!(benches);
