use faer::{Mat, MatRef};
use num_traits::{Float, FromPrimitive, ToPrimitive};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::error::{Result, SymNmfError};
use crate::utils::math::*;

/// Seed used when the caller does not ask for a specific one
pub const DEFAULT_SEED: u64 = 1234;

/////////////
// Helpers //
/////////////

/// Different initialisation methods for the factor matrix H
#[derive(Clone, Debug, Default)]
pub enum HInit<T> {
    /// Uniform in `[0, 2 * sqrt(mean(Wn) / k)]`, so that `H * H^T` starts at
    /// roughly the scale of the normalised similarity matrix
    #[default]
    MeanScaled,
    /// Uniform in `[0, range]`
    Uniform { range: T },
}

/// Parse the respective initialisation
///
/// ### Params
///
/// * `s` - String that defines the initialisation method: `"mean"` or
///   `"uniform"`.
/// * `range` - Upper bound for the `"uniform"` initialisation. Ignored
///   otherwise; `"uniform"` without a range is not valid.
///
/// ### Returns
///
/// The Option of a HInit
pub fn parse_h_initialisation<T>(s: &str, range: Option<T>) -> Option<HInit<T>>
where
    T: Float,
{
    match s.to_lowercase().as_str() {
        "mean" | "mean_scaled" => Some(HInit::MeanScaled),
        "uniform" => range.map(|range| HInit::Uniform { range }),
        _ => None,
    }
}

/// Upper bound of the mean-scaled initialisation
///
/// ### Params
///
/// * `wn` - Normalised similarity matrix
/// * `k` - Number of clusters
///
/// ### Returns
///
/// `2 * sqrt(mean(Wn) / k)`
pub fn mean_scaled_bound<T>(wn: MatRef<T>, k: usize) -> T
where
    T: Float + FromPrimitive,
{
    let two = T::from_f64(2.0).unwrap();
    two * (mat_mean(wn) / T::from(k).unwrap()).sqrt()
}

//////////
// Main //
//////////

/// Draw the initial factor matrix H0
///
/// Every entry is sampled independently from a uniform distribution on
/// `[0, upper]` with a seeded `StdRng`, row by row.
///
/// ### Params
///
/// * `wn` - Normalised similarity matrix (n x n); defines `n` and, for
///   `MeanScaled`, the upper bound.
/// * `k` - Number of clusters, `1 <= k < n`.
/// * `init_method` - Which initialisation to use
/// * `seed` - Random seed for reproducibility
///
/// ### Returns
///
/// Non-negative matrix of shape (n x k)
pub fn initialise_h<T>(wn: MatRef<T>, k: usize, init_method: &HInit<T>, seed: u64) -> Result<Mat<T>>
where
    T: Float + FromPrimitive + ToPrimitive,
{
    let n = wn.nrows();
    if k < 1 || k >= n {
        return Err(SymNmfError::invalid(format!(
            "k must satisfy 1 <= k < n, got k = {} with n = {}",
            k, n
        )));
    }

    let upper = match init_method {
        HInit::MeanScaled => mean_scaled_bound(wn, k),
        HInit::Uniform { range } => *range,
    };
    let upper = upper
        .to_f64()
        .filter(|u| u.is_finite() && *u >= 0.0)
        .ok_or_else(|| SymNmfError::invalid("Upper bound of H0 must be finite and >= 0"))?;

    let dist = Uniform::new_inclusive(0.0, upper)
        .map_err(|e| SymNmfError::invalid(format!("Invalid H0 range: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut h = Mat::from_fn(n, k, |_, _| T::zero());
    for i in 0..n {
        for r in 0..k {
            h[(i, r)] = T::from_f64(dist.sample(&mut rng)).unwrap();
        }
    }

    Ok(h)
}

///////////
// Tests //
///////////
