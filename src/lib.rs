#![allow(clippy::needless_range_loop)] // I like loops ... !

pub mod clustering;
pub mod data;
pub mod error;
pub mod prelude;
pub mod training;
pub mod utils;

use faer::{Mat, MatRef};
use num_traits::{Float, FromPrimitive, ToPrimitive};
use std::{
    iter::Sum,
    marker::{Send, Sync},
    time::Instant,
};
use thousands::*;

use crate::clustering::labels::*;
use crate::data::degree::*;
use crate::data::init::*;
use crate::data::normalise::*;
use crate::data::similarity::*;
use crate::data::structures::*;
use crate::training::symnmf_optimiser::*;
use crate::training::*;

pub use crate::error::{Result, SymNmfError};

/////////////
// Helpers //
/////////////

/// Helper function to generate the normalised similarity matrix
///
/// Runs the three matrix stages in order: Gaussian similarity, degrees and
/// the symmetric normalisation `D^(-1/2) W D^(-1/2)`.
///
/// ### Params
///
/// * `points` - Input data matrix (samples × features)
/// * `verbose` - Controls verbosity
///
/// ### Returns
///
/// The normalised similarity matrix Wn
pub fn construct_normalised_similarity<T>(points: MatRef<T>, verbose: bool) -> Result<Mat<T>>
where
    T: Float + FromPrimitive + Send + Sync,
{
    if verbose {
        println!(
            "Building similarity matrix for {} points with {} features...",
            points.nrows().separate_with_underscores(),
            points.ncols()
        );
    }

    let start = Instant::now();

    let w = similarity_matrix(points)?;
    let degrees = degree_vector(w.as_ref())?;
    let wn = normalised_matrix(w.as_ref(), &degrees)?;

    if verbose {
        println!(
            "Normalised similarity matrix ready in {:.2?}.",
            start.elapsed()
        );
    }

    Ok(wn)
}

/////////////////////////////
// Nested-row entry points //
/////////////////////////////

/// Similarity matrix of a set of points
///
/// ### Params
///
/// * `points` - One row per point; all rows must have the same length
///
/// ### Returns
///
/// `W` as nested rows (n x n)
pub fn similarity<T>(points: &[Vec<T>]) -> Result<Vec<Vec<T>>>
where
    T: Float + FromPrimitive + Send + Sync,
{
    let points = rows_to_mat(points)?;
    let w = similarity_matrix(points.as_ref())?;
    Ok(mat_to_rows(w.as_ref()))
}

/// Diagonal degree matrix of a set of points
///
/// ### Params
///
/// * `points` - One row per point; all rows must have the same length
///
/// ### Returns
///
/// `D` as nested rows (n x n)
pub fn degree<T>(points: &[Vec<T>]) -> Result<Vec<Vec<T>>>
where
    T: Float + FromPrimitive + Send + Sync,
{
    let points = rows_to_mat(points)?;
    let w = similarity_matrix(points.as_ref())?;
    let d = degree_matrix(w.as_ref())?;
    Ok(mat_to_rows(d.as_ref()))
}

/// Normalised similarity matrix of a set of points
///
/// ### Params
///
/// * `points` - One row per point; all rows must have the same length
///
/// ### Returns
///
/// `Wn` as nested rows (n x n)
pub fn normalise<T>(points: &[Vec<T>]) -> Result<Vec<Vec<T>>>
where
    T: Float + FromPrimitive + Send + Sync,
{
    let points = rows_to_mat(points)?;
    let wn = construct_normalised_similarity(points.as_ref(), false)?;
    Ok(mat_to_rows(wn.as_ref()))
}

/// Optimised factor matrix for a set of points and an initial guess
///
/// Uses the default `FactorParams` and the serial optimiser.
///
/// ### Params
///
/// * `points` - One row per point; all rows must have the same length
/// * `h0` - Initial non-negative factor matrix (n x k)
///
/// ### Returns
///
/// The optimised `H` as nested rows (n x k)
pub fn factorise<T>(points: &[Vec<T>], h0: &[Vec<T>]) -> Result<Vec<Vec<T>>>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    let points = rows_to_mat(points)?;
    let h0 = rows_to_mat(h0)?;
    let wn = construct_normalised_similarity(points.as_ref(), false)?;
    let res = factorise_h(
        wn.as_ref(),
        h0.as_ref(),
        &FactorParams::default(),
        &FactorOptimiser::Serial,
        false,
    )?;
    Ok(mat_to_rows(res.h.as_ref()))
}

///////////////////
// Full pipeline //
///////////////////

/// Main config structure of the full SymNMF pipeline
///
/// ### Fields
///
/// * `k` - Number of clusters
/// * `optimiser` - Execution mode of the updates. Defaults to `"serial"`.
/// * `initialisation` - Which initialisation of H to use. Defaults to
///   `"mean"`.
/// * `init_range` - Upper bound for the `"uniform"` initialisation.
/// * `factor_params` - The factorisation parameters.
#[derive(Debug, Clone)]
pub struct SymNmfParams<T> {
    pub k: usize,
    pub optimiser: String,
    pub initialisation: String,
    pub init_range: Option<T>,
    pub factor_params: FactorParams<T>,
}

impl<T> SymNmfParams<T>
where
    T: Float + FromPrimitive,
{
    /// Generate new SymNMF parameters
    ///
    /// ### Params
    ///
    /// * `k` - Number of clusters.
    /// * `optimiser` - `"serial"` or `"parallel"`. Default `"serial"`.
    /// * `initialisation` - `"mean"` or `"uniform"`. Default `"mean"`.
    /// * `init_range` - Upper bound of the `"uniform"` initialisation.
    /// * `factor_params` - Further factorisation parameters.
    ///
    /// ### Returns
    ///
    /// Hopefully sensible standard parameters.
    pub fn new(
        k: usize,
        optimiser: Option<String>,
        initialisation: Option<String>,
        init_range: Option<T>,
        factor_params: Option<FactorParams<T>>,
    ) -> Self {
        Self {
            k,
            optimiser: optimiser.unwrap_or("serial".to_string()),
            initialisation: initialisation.unwrap_or("mean".to_string()),
            init_range,
            factor_params: factor_params.unwrap_or_default(),
        }
    }
}

/// Output of the full pipeline
///
/// ### Fields
///
/// * `wn` - The normalised similarity matrix
/// * `h` - The optimised factor matrix (n x k)
/// * `labels` - Hard cluster label per point
/// * `state` - Final state of the factorisation loop
/// * `n_iter` - Number of updates applied
/// * `loss` - `||Wn - H H^T||_F^2` of the returned H
#[derive(Debug, Clone)]
pub struct SymNmfResult<T> {
    pub wn: Mat<T>,
    pub h: Mat<T>,
    pub labels: Vec<usize>,
    pub state: FactorState,
    pub n_iter: usize,
    pub loss: T,
}

/// Run SymNMF clustering
///
/// 1. Build the Gaussian similarity matrix
/// 2. Normalise it symmetrically by the degrees
/// 3. Draw the initial H (seeded)
/// 4. Optimise H with multiplicative updates
/// 5. Assign every point to the column with the largest membership
///
/// ### Params
///
/// * `points` - Input data matrix (samples × features)
/// * `params` - The SymNMF parameters
/// * `seed` - Seed for the initial H
/// * `verbose` - Controls verbosity of the function
///
/// ### Returns
///
/// The `SymNmfResult`
///
/// ### Example
///
/// ```ignore
/// use faer::Mat;
/// let data = Mat::from_fn(4, 2, |i, j| [[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]][i][j]);
/// let res = symnmf(data.as_ref(), &SymNmfParams::new(2, None, None, None, None), 1234, false)?;
/// // res.labels groups {0, 1} and {2, 3}
/// ```
pub fn symnmf<T>(
    points: MatRef<T>,
    params: &SymNmfParams<T>,
    seed: u64,
    verbose: bool,
) -> Result<SymNmfResult<T>>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync + Sum,
{
    let optimiser = parse_factor_optimiser(&params.optimiser).unwrap_or_default();
    let init = parse_h_initialisation(&params.initialisation, params.init_range)
        .unwrap_or_default();

    let wn = construct_normalised_similarity(points, verbose)?;

    if verbose {
        println!(
            "Initialising H via {} layout...",
            match init {
                HInit::MeanScaled => "mean-scaled",
                HInit::Uniform { .. } => "uniform",
            }
        );
    }

    let h0 = initialise_h(wn.as_ref(), params.k, &init, seed)?;

    let res = factorise_h(
        wn.as_ref(),
        h0.as_ref(),
        &params.factor_params,
        &optimiser,
        verbose,
    )?;

    let labels = extract_clusters(res.h.as_ref());

    if verbose {
        let sizes = cluster_sizes(&labels, params.k);
        println!("Cluster sizes: {:?}", sizes);
        println!("SymNMF complete!");
    }

    Ok(SymNmfResult {
        wn,
        h: res.h,
        labels,
        state: res.state,
        n_iter: res.n_iter,
        loss: res.loss,
    })
}

///////////
// Tests //
///////////

#[cfg(test)]
mod test_lib {
    use super::*;

    fn pairs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
        ]
    }

    #[test]
    fn test_nested_entry_points_shapes() {
        let pts = pairs();
        assert_eq!(similarity(&pts).unwrap().len(), 4);
        assert_eq!(degree(&pts).unwrap()[0].len(), 4);
        assert_eq!(normalise(&pts).unwrap()[3].len(), 4);

        let h0 = vec![vec![0.3, 0.2], vec![0.25, 0.35], vec![0.1, 0.4], vec![0.45, 0.15]];
        let h = factorise(&pts, &h0).unwrap();
        assert_eq!(h.len(), 4);
        assert!(h.iter().all(|r| r.len() == 2 && r.iter().all(|&x| x >= 0.0)));
    }

    #[test]
    fn test_ragged_points_rejected() {
        let pts = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(similarity(&pts), Err(SymNmfError::InvalidInput(_))));
    }

    #[test]
    fn test_symnmf_pipeline_pairs() {
        let pts = rows_to_mat(&pairs()).unwrap();
        let params = SymNmfParams::new(2, None, None, None, None);
        let res = symnmf(pts.as_ref(), &params, DEFAULT_SEED, false).unwrap();

        assert_eq!(res.labels[0], res.labels[1]);
        assert_eq!(res.labels[2], res.labels[3]);
        assert_ne!(res.labels[0], res.labels[2]);
        assert!(res.state.is_terminal());
    }

    #[test]
    fn test_symnmf_k_out_of_range() {
        let pts = rows_to_mat(&pairs()).unwrap();
        let params = SymNmfParams::new(4, None, None, None, None);
        assert!(matches!(
            symnmf(pts.as_ref(), &params, DEFAULT_SEED, false),
            Err(SymNmfError::InvalidInput(_))
        ));
    }
}
