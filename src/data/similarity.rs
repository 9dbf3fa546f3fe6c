use faer::{Mat, MatRef};
use num_traits::{Float, FromPrimitive};
use rayon::prelude::*;

use crate::data::structures::*;
use crate::error::{Result, SymNmfError};
use crate::ensure_finite;
use crate::utils::math::*;

////////////////////////
// Similarity (W / A) //
////////////////////////

/// Gaussian similarity between two points
///
/// ### Params
///
/// * `a` - Point a
/// * `b` - Point b
///
/// ### Returns
///
/// `exp(-||a - b||^2 / 2)`
#[inline(always)]
pub fn gaussian_similarity<T>(a: &[T], b: &[T]) -> T
where
    T: Float + FromPrimitive,
{
    let half = T::from_f64(0.5).unwrap();
    (-squared_euclidean(a, b) * half).exp()
}

/// Build the dense Gaussian similarity matrix
///
/// Computes `W_ij = exp(-||p_i - p_j||^2 / 2)` for `i != j` and `W_ii = 0`.
/// Each unordered pair is evaluated once and mirrored, so the result is
/// exactly symmetric. The upper triangle is computed row-parallel.
///
/// ### Params
///
/// * `points` - Input data matrix (samples x features)
///
/// ### Returns
///
/// The `n x n` similarity matrix
///
/// ### Errors
///
/// * `InvalidInput` - fewer than two points, zero features or a non-finite
///   coordinate.
/// * `NumericInstability` - a non-finite similarity was produced.
pub fn similarity_matrix<T>(points: MatRef<T>) -> Result<Mat<T>>
where
    T: Float + FromPrimitive + Send + Sync,
{
    let (n, dim) = (points.nrows(), points.ncols());

    if n < 2 {
        return Err(SymNmfError::invalid(format!(
            "Need at least 2 points, got {}",
            n
        )));
    }
    if dim < 1 {
        return Err(SymNmfError::invalid("Points need at least 1 dimension"));
    }
    ensure_finite!(points, "Point set");

    let rows = mat_to_rows(points);

    let upper: Vec<Vec<T>> = (0..n)
        .into_par_iter()
        .map(|i| {
            ((i + 1)..n)
                .map(|j| gaussian_similarity(&rows[i], &rows[j]))
                .collect()
        })
        .collect();

    let mut w = Mat::from_fn(n, n, |_, _| T::zero());
    for (i, row) in upper.iter().enumerate() {
        for (offset, &val) in row.iter().enumerate() {
            let j = i + 1 + offset;
            if !val.is_finite() {
                return Err(SymNmfError::unstable(format!(
                    "Non-finite similarity between points {} and {}",
                    i, j
                )));
            }
            w[(i, j)] = val;
            w[(j, i)] = val;
        }
    }

    Ok(w)
}

///////////
// Tests //
///////////

#[cfg(test)]
mod test_similarity {
    use super::*;
    use approx::assert_relative_eq;

    fn pairs() -> Mat<f64> {
        rows_to_mat(&[
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_gaussian_similarity() {
        assert_relative_eq!(gaussian_similarity(&[0.0, 0.0], &[0.0, 0.0]), 1.0);
        assert_relative_eq!(
            gaussian_similarity(&[0.0, 0.0], &[0.0, 1.0]),
            (-0.5f64).exp()
        );
        assert_relative_eq!(
            gaussian_similarity(&[1.0, 1.0], &[3.0, 1.0]),
            (-2.0f64).exp()
        );
    }

    #[test]
    fn test_similarity_symmetric_zero_diagonal() {
        let w = similarity_matrix(pairs().as_ref()).unwrap();
        assert_eq!(w.nrows(), 4);
        assert_eq!(w.ncols(), 4);
        for i in 0..4 {
            assert_eq!(w[(i, i)], 0.0);
            for j in 0..4 {
                assert_eq!(w[(i, j)], w[(j, i)]);
                assert!(w[(i, j)] >= 0.0 && w[(i, j)] <= 1.0);
            }
        }
    }

    #[test]
    fn test_similarity_pairs_dominate() {
        let w = similarity_matrix(pairs().as_ref()).unwrap();
        assert_relative_eq!(w[(0, 1)], (-0.5f64).exp());
        assert_relative_eq!(w[(2, 3)], (-0.5f64).exp());
        assert!(w[(0, 1)] > 1e6 * w[(0, 2)]);
        assert!(w[(2, 3)] > 1e6 * w[(1, 3)]);
    }

    #[test]
    fn test_similarity_too_few_points() {
        let one = rows_to_mat(&[vec![1.0, 2.0]]).unwrap();
        let err = similarity_matrix(one.as_ref()).unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidInput(_)));
    }

    #[test]
    fn test_similarity_non_finite_coordinate() {
        let bad = rows_to_mat(&[vec![1.0, f64::NAN], vec![0.0, 0.0]]).unwrap();
        let err = similarity_matrix(bad.as_ref()).unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidInput(_)));
    }

    #[test]
    fn test_similarity_f32() {
        let pts = Mat::from_fn(3, 1, |i, _| i as f32);
        let w = similarity_matrix(pts.as_ref()).unwrap();
        assert_relative_eq!(w[(0, 1)], (-0.5f32).exp());
        assert_relative_eq!(w[(0, 2)], (-2.0f32).exp());
    }
}
