use faer::MatRef;
use num_traits::Float;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::iter::Sum;

use crate::data::structures::*;
use crate::error::{Result, SymNmfError};
use crate::utils::math::*;

////////////////
// Silhouette //
////////////////

/// Silhouette coefficient of every point
///
/// `s_i = (b_i - a_i) / max(a_i, b_i)` where `a_i` is the mean Euclidean
/// distance to the other members of its own cluster and `b_i` the smallest
/// mean distance to the members of another cluster. Points in a singleton
/// cluster get `s_i = 0`.
///
/// ### Params
///
/// * `points` - Input data matrix (samples x features)
/// * `labels` - Cluster label per point; labels need not be contiguous
///
/// ### Returns
///
/// Vector with the coefficient per point
///
/// ### Errors
///
/// `InvalidInput` if the number of labels does not match the number of
/// points or the number of distinct labels is not in `[2, n - 1]`.
pub fn silhouette_samples<T>(points: MatRef<T>, labels: &[usize]) -> Result<Vec<T>>
where
    T: Float + Send + Sync + Sum,
{
    let n = points.nrows();
    if labels.len() != n {
        return Err(SymNmfError::invalid(format!(
            "Got {} labels for {} points",
            labels.len(),
            n
        )));
    }

    // map arbitrary labels onto 0..n_clusters
    let mut cluster_idx: FxHashMap<usize, usize> = FxHashMap::default();
    for &l in labels {
        let next = cluster_idx.len();
        cluster_idx.entry(l).or_insert(next);
    }
    let n_clusters = cluster_idx.len();
    if n_clusters < 2 || n_clusters > n - 1 {
        return Err(SymNmfError::invalid(format!(
            "Silhouette needs 2 <= n_clusters <= n - 1, got {} clusters for {} points",
            n_clusters, n
        )));
    }

    let assigned: Vec<usize> = labels.iter().map(|l| cluster_idx[l]).collect();
    let mut sizes = vec![0usize; n_clusters];
    for &c in &assigned {
        sizes[c] += 1;
    }

    let rows = mat_to_rows(points);
    let dist = pairwise_euclidean(&rows);

    let scores = (0..n)
        .into_par_iter()
        .map(|i| {
            let own = assigned[i];
            if sizes[own] == 1 {
                return T::zero();
            }

            let mut sums = vec![T::zero(); n_clusters];
            for j in 0..n {
                if j != i {
                    sums[assigned[j]] = sums[assigned[j]] + dist[i][j];
                }
            }

            let a = sums[own] / T::from(sizes[own] - 1).unwrap();
            let b = (0..n_clusters)
                .filter(|&c| c != own)
                .map(|c| sums[c] / T::from(sizes[c]).unwrap())
                .fold(T::infinity(), T::min);

            let denom = a.max(b);
            if denom > T::zero() {
                (b - a) / denom
            } else {
                T::zero()
            }
        })
        .collect();

    Ok(scores)
}

/// Mean silhouette coefficient over all points
///
/// ### Params
///
/// * `points` - Input data matrix (samples x features)
/// * `labels` - Cluster label per point
///
/// ### Returns
///
/// The mean silhouette score in `[-1, 1]`
pub fn silhouette_score<T>(points: MatRef<T>, labels: &[usize]) -> Result<T>
where
    T: Float + Send + Sync + Sum,
{
    let samples = silhouette_samples(points, labels)?;
    let n = T::from(samples.len()).unwrap();
    Ok(samples.into_iter().sum::<T>() / n)
}

///////////
// Tests //
///////////
