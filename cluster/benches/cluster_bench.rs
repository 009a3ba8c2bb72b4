use criterion::{Criterion, black_box, criterion_group, criterion_main};
use picgroup_cluster::{Algorithm, Assigner, PartitionConfig, build_profiles, partition};

fn random_unit_vec(dim: usize, seed: u64) -> Vec<f32> {
    let mut v = Vec::with_capacity(dim);
    let mut state = seed;
    for _ in 0..dim {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        v.push(((state >> 33) as f32) / (u32::MAX as f32) - 0.5);
    }
    unit(v)
}

fn unit(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let s = (1.0 / norm) as f32;
        for x in &mut v {
            *x *= s;
        }
    }
    v
}

fn make_cluster(centroid: &[f32], n: usize, noise: f32, base_seed: u64) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| {
            let rvec = random_unit_vec(centroid.len(), base_seed.wrapping_add(i as u64 * 997));
            unit(centroid.iter().zip(&rvec).map(|(&c, &r)| c + r * noise).collect())
        })
        .collect()
}

fn three_clusters(dim: usize) -> Vec<Vec<f32>> {
    let mut all = Vec::new();
    for (i, seed) in [10u64, 20, 30].into_iter().enumerate() {
        let c = random_unit_vec(dim, seed);
        all.extend(make_cluster(&c, 20, 0.1, 100 * (i as u64 + 1)));
    }
    all
}

fn bench_decide(c: &mut Criterion) {
    let dim = 512;
    let data = three_clusters(dim);
    let members: Vec<(u64, &[f32])> = data
        .iter()
        .enumerate()
        .map(|(i, v)| ((i / 20) as u64, v.as_slice()))
        .collect();
    let assigner = Assigner::default();
    let test_emb = random_unit_vec(dim, 999);

    c.bench_function("decide_512d_3clusters_rebuild_profiles", |b| {
        b.iter(|| {
            let profiles = build_profiles(members.iter().copied()).unwrap();
            let _ = black_box(assigner.decide(black_box(&test_emb), &profiles, Some(2)));
        });
    });
}

fn bench_partition(c: &mut Criterion) {
    let dim = 512;
    let data = three_clusters(dim);
    let ids: Vec<String> = (0..data.len()).map(|i| format!("img-{i}")).collect();
    let cfg = PartitionConfig::default();

    c.bench_function("partition_kmeans_512d_60points_k3", |b| {
        b.iter(|| {
            let _ = black_box(partition(&data, &ids, Algorithm::KMeans, Some(3), &cfg));
        });
    });

    c.bench_function("partition_hierarchical_512d_60points_k3", |b| {
        b.iter(|| {
            let _ = black_box(partition(&data, &ids, Algorithm::Hierarchical, Some(3), &cfg));
        });
    });

    c.bench_function("partition_kmeans_512d_60points_auto_k", |b| {
        b.iter(|| {
            let _ = black_box(partition(&data, &ids, Algorithm::KMeans, None, &cfg));
        });
    });
}

criterion_group!(benches, bench_decide, bench_partition);
criterion_main!(benches);
