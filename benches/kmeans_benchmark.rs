use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lloydkmeans_rs::{elbow_method, ElbowConfig, KMeans, KMeansConfig, NoopVisualizer};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

const DATA_SEED: u64 = 42;

/// Seeded points in [-1, 1)
fn random_data(n_samples: usize, n_features: usize, seed: u64) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::random_using(
        (n_samples, n_features),
        Uniform::new(-1.0, 1.0),
        &mut rng,
    )
}

fn benchmark_kmeans_varying_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_samples");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_features = 8;
    let k = 10;
    let sample_sizes = [1_000, 5_000, 10_000];

    for n_samples in sample_sizes.iter() {
        group.throughput(Throughput::Elements(*n_samples as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_samples),
            n_samples,
            |b, &n_samples| {
                let data = random_data(n_samples, n_features, DATA_SEED);
                // Negative tolerance: always run exactly max_iters iterations
                let config = KMeansConfig::new(k).with_max_iters(5).with_tol(-1.0).with_seed(42);

                b.iter(|| {
                    let mut kmeans = KMeans::with_config(config.clone());
                    kmeans.train(black_box(&data.view())).unwrap();
                    kmeans
                });
            },
        );
    }
    group.finish();
}

fn benchmark_kmeans_varying_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_clusters");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let data = random_data(5_000, 8, DATA_SEED);
    let cluster_counts = [5, 20, 50];

    for k in cluster_counts.iter() {
        group.throughput(Throughput::Elements(*k as u64));
        group.bench_with_input(BenchmarkId::from_parameter(k), k, |b, &k| {
            let config = KMeansConfig::new(k).with_max_iters(5).with_tol(-1.0).with_seed(42);

            b.iter(|| {
                let mut kmeans = KMeans::with_config(config.clone());
                kmeans.train(black_box(&data.view())).unwrap();
                kmeans
            });
        });
    }
    group.finish();
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_predict");
    group.sample_size(20);

    let n_features = 8;
    let train_data = random_data(5_000, n_features, DATA_SEED);
    let mut kmeans = KMeans::with_config(KMeansConfig::new(20).with_max_iters(10).with_seed(42));
    kmeans.train(&train_data.view()).unwrap();

    let predict_sizes = [1_000, 10_000];

    for n_predict in predict_sizes.iter() {
        group.throughput(Throughput::Elements(*n_predict as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_predict),
            n_predict,
            |b, &n_predict| {
                let test_data = random_data(n_predict, n_features, DATA_SEED + 1);
                b.iter(|| kmeans.predict(black_box(&test_data.view())).unwrap());
            },
        );
    }
    group.finish();
}

fn benchmark_elbow(c: &mut Criterion) {
    let mut group = c.benchmark_group("elbow_method");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(3));

    let data = random_data(2_000, 2, DATA_SEED);
    let config = ElbowConfig::new(10).with_max_iters(20);

    group.bench_function("2k_samples_k_max_10", |b| {
        b.iter(|| elbow_method(black_box(&data.view()), &config, &mut NoopVisualizer).unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_kmeans_varying_samples,
    benchmark_kmeans_varying_clusters,
    benchmark_predict,
    benchmark_elbow,
);

criterion_main!(benches);
