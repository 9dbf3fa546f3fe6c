use faer::Mat;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Create a synthetic dataset with well-separated clusters
///
/// Cluster centres sit 20 units apart along different axes and every point
/// gets uniform noise in [-0.25, 0.25] per coordinate, so the Gaussian
/// similarity matrix is close to block-diagonal.
pub fn create_diagnostic_data(
    n_per_cluster: usize,
    n_clusters: usize,
    n_dim: usize,
    seed: u64,
) -> (Mat<f64>, Vec<usize>) {
    assert!(n_clusters <= n_dim + 1, "Not enough dimensions for the centres");

    let mut rng = StdRng::seed_from_u64(seed);
    let n_total = n_per_cluster * n_clusters;

    let mut data_vec = Vec::with_capacity(n_total * n_dim);
    let mut labels = Vec::with_capacity(n_total);

    // cluster 0 at the origin, cluster c at 20 * e_(c - 1)
    let centres: Vec<Vec<f64>> = (0..n_clusters)
        .map(|c| {
            (0..n_dim)
                .map(|i| if c > 0 && i == c - 1 { 20.0 } else { 0.0 })
                .collect()
        })
        .collect();

    for (cluster_id, centre) in centres.iter().enumerate() {
        for _ in 0..n_per_cluster {
            for dim in 0..n_dim {
                let noise: f64 = rng.random::<f64>() * 0.5 - 0.25;
                data_vec.push(centre[dim] + noise);
            }
            labels.push(cluster_id);
        }
    }

    let data = Mat::from_fn(n_total, n_dim, |i, j| data_vec[i * n_dim + j]);
    (data, labels)
}

/// Check that a predicted labelling matches the truth up to a permutation
///
/// Every true cluster has to map onto exactly one predicted label and no two
/// true clusters may share a predicted label.
pub fn same_partition(truth: &[usize], predicted: &[usize]) -> bool {
    assert_eq!(truth.len(), predicted.len());
    for i in 0..truth.len() {
        for j in 0..truth.len() {
            if (truth[i] == truth[j]) != (predicted[i] == predicted[j]) {
                return false;
            }
        }
    }
    true
}
