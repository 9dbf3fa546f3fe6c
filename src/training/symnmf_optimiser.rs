use faer::{Mat, MatRef};
use num_traits::{Float, FromPrimitive, ToPrimitive};
use rayon::prelude::*;
use std::time::Instant;
use thousands::*;

use crate::error::{Result, SymNmfError};
use crate::training::*;
use crate::utils::math::*;
use crate::ensure_square;

////////////
// SymNMF //
////////////

/////////////
// Globals //
/////////////

/// Default maximum number of multiplicative updates
const MAX_ITER: usize = 300;
/// Default convergence tolerance on the squared Frobenius change
const TOL: f64 = 1e-4;
/// Default stabiliser added to the denominator of the update
const EPS: f64 = 1e-9;
/// Default damping of the multiplicative update
const BETA: f64 = 0.5;

//////////////////////////
// Structures and Enums //
//////////////////////////

/// SymNMF optimisation parameters
///
/// ### Fields
///
/// * `max_iter` - Maximum number of multiplicative updates (typically 300)
/// * `tol` - The loop stops once `||H_new - H_old||_F^2 < tol` (typically
///   1e-4)
/// * `eps` - Small positive value added to the denominator of the update so
///   a zero denominator cannot divide by zero (typically 1e-9)
/// * `beta` - Damping of the update in `(0, 1]`. The update multiplies every
///   entry by `1 - beta + beta * (Wn H)_ir / ((H H^T H)_ir + eps)`; with
///   `beta = 1` this is the plain multiplicative rule.
#[derive(Clone, Debug)]
pub struct FactorParams<T> {
    pub max_iter: usize,
    pub tol: T,
    pub eps: T,
    pub beta: T,
}

impl<T> FactorParams<T>
where
    T: Float + FromPrimitive,
{
    /// Generate new factorisation parameters
    ///
    /// ### Params
    ///
    /// * `max_iter` - Maximum number of updates. Default `300`.
    /// * `tol` - Convergence tolerance. Default `1e-4`.
    /// * `eps` - Denominator stabiliser. Default `1e-9`.
    /// * `beta` - Damping factor. Default `0.5`.
    ///
    /// ### Returns
    ///
    /// Initialised self
    pub fn new(max_iter: Option<usize>, tol: Option<T>, eps: Option<T>, beta: Option<T>) -> Self {
        let max_iter = max_iter.unwrap_or(MAX_ITER);
        let tol = tol.unwrap_or(T::from_f64(TOL).unwrap());
        let eps = eps.unwrap_or(T::from_f64(EPS).unwrap());
        let beta = beta.unwrap_or(T::from_f64(BETA).unwrap());

        Self {
            max_iter,
            tol,
            eps,
            beta,
        }
    }

    /// Check that the parameters are usable
    ///
    /// ### Returns
    ///
    /// `InvalidInput` if `beta` is outside `(0, 1]`, `eps <= 0` or `tol < 0`
    pub fn validate(&self) -> Result<()> {
        if !(self.beta > T::zero() && self.beta <= T::one()) {
            return Err(SymNmfError::invalid("beta must lie in (0, 1]"));
        }
        if !(self.eps > T::zero()) || !self.eps.is_finite() {
            return Err(SymNmfError::invalid("eps must be a positive finite value"));
        }
        if !(self.tol >= T::zero()) {
            return Err(SymNmfError::invalid("tol must be >= 0"));
        }
        Ok(())
    }
}

impl<T: Float + FromPrimitive> Default for FactorParams<T> {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

/// How a single multiplicative update is executed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FactorOptimiser {
    /// Single-threaded
    #[default]
    Serial,
    /// Rows of the next iterate computed in parallel via rayon
    Parallel,
}

/// Parse the SymNMF optimiser to use
///
/// ### Params
///
/// * `s` - String defining the optimiser. Choice of `"serial"` or
///   `"parallel"`.
///
/// ### Return
///
/// Option of FactorOptimiser
pub fn parse_factor_optimiser(s: &str) -> Option<FactorOptimiser> {
    match s.to_lowercase().as_str() {
        "serial" => Some(FactorOptimiser::Serial),
        "parallel" => Some(FactorOptimiser::Parallel),
        _ => None,
    }
}

/////////////
// Helpers //
/////////////

/// Symmetric factorisation loss
///
/// ### Params
///
/// * `wn` - Normalised similarity matrix (n x n)
/// * `h` - Factor matrix (n x k)
///
/// ### Returns
///
/// `||Wn - H H^T||_F^2`
pub fn symnmf_loss<T>(wn: MatRef<T>, h: MatRef<T>) -> T
where
    T: Float,
{
    let hht = matmul(h, h.transpose());
    frobenius_sq_diff(wn, hht.as_ref())
}

/// Compute row `i` of the next iterate
///
/// `H H^T H` is evaluated as `H (H^T H)` with the pre-computed Gram matrix.
///
/// ### Params
///
/// * `i` - Row index
/// * `wn` - Normalised similarity matrix (n x n)
/// * `h` - Current iterate (n x k)
/// * `g` - Gram matrix `H^T H` of the current iterate (k x k)
/// * `params` - Factorisation parameters
///
/// ### Returns
///
/// The `k` entries of row `i` of the next iterate
#[inline(always)]
fn update_row<T>(i: usize, wn: MatRef<T>, h: MatRef<T>, g: MatRef<T>, params: &FactorParams<T>) -> Vec<T>
where
    T: Float,
{
    let (n, k) = (h.nrows(), h.ncols());
    let keep = T::one() - params.beta;

    (0..k)
        .map(|r| {
            let mut numerator = T::zero();
            for l in 0..n {
                numerator = numerator + wn[(i, l)] * h[(l, r)];
            }
            let mut denominator = T::zero();
            for s in 0..k {
                denominator = denominator + h[(i, s)] * g[(s, r)];
            }
            h[(i, r)] * (keep + params.beta * numerator / (denominator + params.eps))
        })
        .collect()
}

/// Apply one synchronous multiplicative update
///
/// Every entry of `h_next` is computed from the full `h_curr`; `h_curr` is
/// never written. The serial and parallel versions run the same per-row
/// arithmetic and therefore give bit-identical results.
///
/// ### Params
///
/// * `wn` - Normalised similarity matrix (n x n)
/// * `h_curr` - Current iterate (n x k)
/// * `h_next` - Buffer for the next iterate (n x k); fully overwritten
/// * `params` - Factorisation parameters
/// * `optimiser` - Serial or parallel execution
///
/// ### Returns
///
/// The squared Frobenius distance `||h_next - h_curr||_F^2`
pub fn multiplicative_update<T>(
    wn: MatRef<T>,
    h_curr: MatRef<T>,
    h_next: &mut Mat<T>,
    params: &FactorParams<T>,
    optimiser: &FactorOptimiser,
) -> T
where
    T: Float + Send + Sync,
{
    let (n, k) = (h_curr.nrows(), h_curr.ncols());
    let g = gram(h_curr);
    let g = g.as_ref();

    let rows: Vec<Vec<T>> = match optimiser {
        FactorOptimiser::Serial => (0..n)
            .map(|i| update_row(i, wn, h_curr, g, params))
            .collect(),
        FactorOptimiser::Parallel => (0..n)
            .into_par_iter()
            .map(|i| update_row(i, wn, h_curr, g, params))
            .collect(),
    };

    let mut delta = T::zero();
    for (i, row) in rows.iter().enumerate() {
        for r in 0..k {
            let diff = row[r] - h_curr[(i, r)];
            delta = delta + diff * diff;
            h_next[(i, r)] = row[r];
        }
    }

    delta
}

/// Validate the inputs of the factorisation
fn check_factor_inputs<T>(wn: MatRef<T>, h0: MatRef<T>) -> Result<()>
where
    T: Float,
{
    ensure_square!(wn, "Normalised similarity matrix");
    if let Some((i, j)) = find_non_finite(wn) {
        return Err(SymNmfError::invalid(format!(
            "Normalised similarity matrix has a non-finite entry at ({}, {})",
            i, j
        )));
    }
    if let Some((i, j)) = find_negative(wn) {
        return Err(SymNmfError::invalid(format!(
            "Normalised similarity matrix has a negative entry at ({}, {})",
            i, j
        )));
    }

    let (n, k) = (h0.nrows(), h0.ncols());
    if n != wn.nrows() {
        return Err(SymNmfError::invalid(format!(
            "H0 has {} rows, expected {}",
            n,
            wn.nrows()
        )));
    }
    if k < 1 || k >= n {
        return Err(SymNmfError::invalid(format!(
            "k must satisfy 1 <= k < n, got k = {} with n = {}",
            k, n
        )));
    }
    if let Some((i, j)) = find_non_finite(h0) {
        return Err(SymNmfError::invalid(format!(
            "H0 has a non-finite entry at ({}, {})",
            i, j
        )));
    }
    if let Some((i, j)) = find_negative(h0) {
        return Err(SymNmfError::invalid(format!(
            "H0 has a negative entry at ({}, {})",
            i, j
        )));
    }

    Ok(())
}

//////////
// Main //
//////////

/// Optimise the factor matrix H so that `Wn ~ H H^T`
///
/// Runs the damped multiplicative update until the squared Frobenius change
/// between two successive iterates falls below `params.tol` or
/// `params.max_iter` updates have been applied. The two iterates live in
/// separate buffers that are swapped after every update.
///
/// ### Params
///
/// * `wn` - Normalised similarity matrix (n x n), non-negative
/// * `h0` - Initial factor matrix (n x k), non-negative, `1 <= k < n`
/// * `params` - Factorisation parameters
/// * `optimiser` - Serial or parallel execution of each update
/// * `verbose` - Print progress every 50 iterations
///
/// ### Returns
///
/// The `FactorisationResult` with the optimised H and the final state
///
/// ### Errors
///
/// * `InvalidInput` - bad shapes, `k` out of range, negative or non-finite
///   entries in `wn` or `h0`, or invalid parameters.
/// * `NumericInstability` - a non-finite value appeared in H.
pub fn factorise_h<T>(
    wn: MatRef<T>,
    h0: MatRef<T>,
    params: &FactorParams<T>,
    optimiser: &FactorOptimiser,
    verbose: bool,
) -> Result<FactorisationResult<T>>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    params.validate()?;
    check_factor_inputs(wn, h0)?;

    let (n, k) = (h0.nrows(), h0.ncols());

    if verbose {
        println!(
            "Factorising {} x {} matrix into rank {} (max {} iterations)...",
            n.separate_with_underscores(),
            n.separate_with_underscores(),
            k,
            params.max_iter
        );
    }

    let start = Instant::now();

    let mut h_curr = Mat::from_fn(n, k, |i, r| h0[(i, r)]);
    let mut h_next = Mat::from_fn(n, k, |_, _| T::zero());
    let mut state = FactorState::Initialised;
    let mut delta = T::infinity();
    let mut n_iter = 0;

    for iter in 0..params.max_iter {
        state = FactorState::Iterating;

        delta = multiplicative_update(wn, h_curr.as_ref(), &mut h_next, params, optimiser);

        if let Some((i, r)) = find_non_finite(h_next.as_ref()) {
            return Err(SymNmfError::unstable(format!(
                "H has a non-finite entry at ({}, {}) after iteration {}",
                i,
                r,
                iter + 1
            )));
        }
        if !delta.is_finite() {
            return Err(SymNmfError::unstable(format!(
                "Change between iterates is not finite after iteration {}",
                iter + 1
            )));
        }

        std::mem::swap(&mut h_curr, &mut h_next);
        n_iter = iter + 1;

        if verbose && (n_iter % 50 == 0) {
            println!(
                " Completed iteration {}/{} (delta: {:.3e}, loss: {:.6})",
                n_iter,
                params.max_iter,
                delta.to_f64().unwrap_or(f64::NAN),
                symnmf_loss(wn, h_curr.as_ref()).to_f64().unwrap_or(f64::NAN)
            );
        }

        if delta < params.tol {
            state = FactorState::Converged;
            break;
        }
    }

    if state == FactorState::Iterating {
        state = FactorState::MaxIterReached;
    }

    let loss = symnmf_loss(wn, h_curr.as_ref());

    if verbose {
        println!(
            "Factorisation {} after {} iterations in {:.2?} (loss: {:.6}).",
            state,
            n_iter,
            start.elapsed(),
            loss.to_f64().unwrap_or(f64::NAN)
        );
    }

    Ok(FactorisationResult {
        h: h_curr,
        state,
        n_iter,
        delta,
        loss,
    })
}

///////////
// Tests //
///////////
