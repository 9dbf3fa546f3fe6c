use faer::MatRef;
use num_traits::{Float, FromPrimitive};
use rayon::prelude::*;
use std::time::Instant;
use thousands::*;

use crate::data::structures::*;
use crate::error::{Result, SymNmfError};
use crate::utils::math::*;

/////////////
// k-means //
/////////////

/// k-means parameters
///
/// ### Fields
///
/// * `max_iter` - Maximum number of Lloyd iterations (typically 300)
/// * `tol` - The loop stops once every centroid moved less than this
///   (Euclidean) distance (typically 1e-4)
#[derive(Clone, Debug)]
pub struct KmeansParams<T> {
    pub max_iter: usize,
    pub tol: T,
}

impl<T> KmeansParams<T>
where
    T: Float + FromPrimitive,
{
    /// Generate new k-means parameters
    ///
    /// ### Params
    ///
    /// * `max_iter` - Maximum number of iterations. Default `300`.
    /// * `tol` - Convergence tolerance. Default `1e-4`.
    ///
    /// ### Returns
    ///
    /// Initialised self
    pub fn new(max_iter: Option<usize>, tol: Option<T>) -> Self {
        Self {
            max_iter: max_iter.unwrap_or(300),
            tol: tol.unwrap_or(T::from_f64(1e-4).unwrap()),
        }
    }
}

impl<T: Float + FromPrimitive> Default for KmeansParams<T> {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Output of k-means
///
/// ### Fields
///
/// * `labels` - Index of the nearest centroid per point
/// * `centroids` - Final centroids, one per cluster
/// * `inertia` - Sum of squared distances to the assigned centroid
/// * `n_iter` - Number of Lloyd iterations run
#[derive(Clone, Debug)]
pub struct KmeansResult<T> {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<T>>,
    pub inertia: T,
    pub n_iter: usize,
}

/// Index of the nearest centroid; ties go to the lowest index
#[inline(always)]
fn nearest_centroid<T>(point: &[T], centroids: &[Vec<T>]) -> usize
where
    T: Float,
{
    let mut best = 0;
    let mut best_dist = squared_euclidean(point, &centroids[0]);
    for (c, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = squared_euclidean(point, centroid);
        if dist < best_dist {
            best = c;
            best_dist = dist;
        }
    }
    best
}

/// Assign every point to its nearest centroid
fn assign<T>(points: &[Vec<T>], centroids: &[Vec<T>]) -> Vec<usize>
where
    T: Float + Send + Sync,
{
    points
        .par_iter()
        .map(|p| nearest_centroid(p, centroids))
        .collect()
}

/// Recompute the centroids as cluster means; empty clusters collapse to the
/// zero vector
fn update_centroids<T>(points: &[Vec<T>], labels: &[usize], k: usize) -> Vec<Vec<T>>
where
    T: Float,
{
    let dim = points[0].len();
    let mut sums = vec![vec![T::zero(); dim]; k];
    let mut counts = vec![0usize; k];

    for (p, &l) in points.iter().zip(labels) {
        counts[l] += 1;
        for (s, &x) in sums[l].iter_mut().zip(p) {
            *s = *s + x;
        }
    }

    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 0 {
            let denom = T::from(count).unwrap();
            sum.iter_mut().for_each(|s| *s = *s / denom);
        }
    }

    sums
}

/// Baseline clustering via Lloyd's k-means
///
/// The first `k` points are used as initial centroids, which makes the
/// result fully deterministic.
///
/// ### Params
///
/// * `points` - Input data matrix (samples x features)
/// * `k` - Number of clusters, `1 <= k < n`
/// * `params` - k-means parameters
/// * `verbose` - Controls verbosity
///
/// ### Returns
///
/// The `KmeansResult`
pub fn kmeans<T>(
    points: MatRef<T>,
    k: usize,
    params: &KmeansParams<T>,
    verbose: bool,
) -> Result<KmeansResult<T>>
where
    T: Float + FromPrimitive + Send + Sync,
{
    let n = points.nrows();
    if k < 1 || k >= n {
        return Err(SymNmfError::invalid(format!(
            "k must satisfy 1 <= k < n, got k = {} with n = {}",
            k, n
        )));
    }
    if points.ncols() < 1 {
        return Err(SymNmfError::invalid("Points need at least 1 dimension"));
    }

    let start = Instant::now();
    let rows = mat_to_rows(points);
    let mut centroids: Vec<Vec<T>> = rows[..k].to_vec();
    let mut n_iter = 0;

    for _ in 0..params.max_iter {
        let labels = assign(&rows, &centroids);
        let new_centroids = update_centroids(&rows, &labels, k);
        n_iter += 1;

        let converged = centroids
            .iter()
            .zip(&new_centroids)
            .all(|(old, new)| euclidean(old, new) < params.tol);

        centroids = new_centroids;
        if converged {
            break;
        }
    }

    let labels = assign(&rows, &centroids);
    let inertia = rows
        .iter()
        .zip(&labels)
        .fold(T::zero(), |acc, (p, &l)| acc + squared_euclidean(p, &centroids[l]));

    if verbose {
        println!(
            "k-means on {} points finished after {} iterations in {:.2?}.",
            n.separate_with_underscores(),
            n_iter,
            start.elapsed()
        );
    }

    Ok(KmeansResult {
        labels,
        centroids,
        inertia,
        n_iter,
    })
}

///////////
// Tests //
///////////
