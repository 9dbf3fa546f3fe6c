use faer::{Mat, MatRef};
use num_traits::Float;

use crate::error::Result;
use crate::utils::math::*;
use crate::{ensure_finite, ensure_square};

////////////
// Degree //
////////////

/// Degrees of a similarity matrix
///
/// ### Params
///
/// * `w` - Square similarity matrix
///
/// ### Returns
///
/// `d_i = sum_j W_ij` for every row
///
/// ### Errors
///
/// `InvalidInput` if `w` is not square or contains NaN/Inf.
pub fn degree_vector<T>(w: MatRef<T>) -> Result<Vec<T>>
where
    T: Float,
{
    ensure_square!(w, "Similarity matrix");
    ensure_finite!(w, "Similarity matrix");

    Ok(row_sums(w))
}

/// Diagonal degree matrix of a similarity matrix
///
/// ### Params
///
/// * `w` - Square similarity matrix
///
/// ### Returns
///
/// `D` with `D_ii = sum_j W_ij` and exact zeros off the diagonal
pub fn degree_matrix<T>(w: MatRef<T>) -> Result<Mat<T>>
where
    T: Float,
{
    let degrees = degree_vector(w)?;
    let n = degrees.len();

    Ok(Mat::from_fn(n, n, |i, j| {
        if i == j {
            degrees[i]
        } else {
            T::zero()
        }
    }))
}

///////////
// Tests //
///////////
