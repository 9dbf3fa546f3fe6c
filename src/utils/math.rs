//! Dense vector and matrix primitives used by all stages of the engine.
//! Everything here is a plain loop over `faer` matrices or slices; the
//! matrices involved are small enough (N x N, N x k) that clarity wins.

use faer::{Mat, MatRef};
use num_traits::Float;
use rayon::prelude::*;
use std::iter::Sum;

use crate::assert_same_len;

/////////////
// Vectors //
/////////////

/// Squared Euclidean distance between two vectors
///
/// ### Params
///
/// * `a` - Vector a
/// * `b` - Vector b
///
/// ### Returns
///
/// `sum((a_i - b_i)^2)`
#[inline(always)]
pub fn squared_euclidean<T>(a: &[T], b: &[T]) -> T
where
    T: Float,
{
    assert_same_len!(a, b);
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc + (x - y) * (x - y))
}

/// Euclidean distance between two vectors
///
/// ### Params
///
/// * `a` - Vector a
/// * `b` - Vector b
///
/// ### Returns
///
/// The (non-squared) Euclidean distance
#[inline(always)]
pub fn euclidean<T>(a: &[T], b: &[T]) -> T
where
    T: Float,
{
    squared_euclidean(a, b).sqrt()
}

//////////////
// Matrices //
//////////////

/// Sum of every row of a matrix
///
/// ### Params
///
/// * `mat` - The matrix
///
/// ### Returns
///
/// Vector of length `mat.nrows()` with the row sums, accumulated left to
/// right.
pub fn row_sums<T>(mat: MatRef<T>) -> Vec<T>
where
    T: Float,
{
    (0..mat.nrows())
        .map(|i| {
            let mut sum = T::zero();
            for j in 0..mat.ncols() {
                sum = sum + mat[(i, j)];
            }
            sum
        })
        .collect()
}

/// Mean over all entries of a matrix
///
/// ### Params
///
/// * `mat` - The matrix
///
/// ### Returns
///
/// The arithmetic mean; zero for an empty matrix
pub fn mat_mean<T>(mat: MatRef<T>) -> T
where
    T: Float,
{
    let n_entries = mat.nrows() * mat.ncols();
    if n_entries == 0 {
        return T::zero();
    }
    let total = row_sums(mat)
        .into_iter()
        .fold(T::zero(), |acc, x| acc + x);
    total / T::from(n_entries).unwrap()
}

/// Dense matrix product `A * B`
///
/// ### Params
///
/// * `a` - Left matrix (n x m)
/// * `b` - Right matrix (m x p)
///
/// ### Returns
///
/// The product (n x p)
pub fn matmul<T>(a: MatRef<T>, b: MatRef<T>) -> Mat<T>
where
    T: Float,
{
    assert_eq!(a.ncols(), b.nrows(), "Inner dimensions do not match");
    Mat::from_fn(a.nrows(), b.ncols(), |i, j| {
        let mut acc = T::zero();
        for l in 0..a.ncols() {
            acc = acc + a[(i, l)] * b[(l, j)];
        }
        acc
    })
}

/// Gram matrix `H^T * H`
///
/// ### Params
///
/// * `h` - Matrix of shape (n x k)
///
/// ### Returns
///
/// Symmetric (k x k) matrix
pub fn gram<T>(h: MatRef<T>) -> Mat<T>
where
    T: Float,
{
    let k = h.ncols();
    let mut g = Mat::from_fn(k, k, |_, _| T::zero());
    for r in 0..k {
        for s in r..k {
            let mut acc = T::zero();
            for i in 0..h.nrows() {
                acc = acc + h[(i, r)] * h[(i, s)];
            }
            g[(r, s)] = acc;
            g[(s, r)] = acc;
        }
    }
    g
}

/// Squared Frobenius distance between two matrices of the same shape
///
/// ### Params
///
/// * `a` - Matrix a
/// * `b` - Matrix b
///
/// ### Returns
///
/// `sum_ij (a_ij - b_ij)^2`
pub fn frobenius_sq_diff<T>(a: MatRef<T>, b: MatRef<T>) -> T
where
    T: Float,
{
    assert_eq!(
        (a.nrows(), a.ncols()),
        (b.nrows(), b.ncols()),
        "Matrices have different shapes"
    );
    let mut acc = T::zero();
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            let diff = a[(i, j)] - b[(i, j)];
            acc = acc + diff * diff;
        }
    }
    acc
}

/// Position of the first non-finite entry (row-major order)
///
/// ### Params
///
/// * `mat` - The matrix to check
///
/// ### Returns
///
/// `Some((row, col))` of the first NaN/Inf entry, `None` if all are finite
pub fn find_non_finite<T>(mat: MatRef<T>) -> Option<(usize, usize)>
where
    T: Float,
{
    for i in 0..mat.nrows() {
        for j in 0..mat.ncols() {
            if !mat[(i, j)].is_finite() {
                return Some((i, j));
            }
        }
    }
    None
}

/// Position of the first negative entry (row-major order)
///
/// ### Params
///
/// * `mat` - The matrix to check
///
/// ### Returns
///
/// `Some((row, col))` of the first entry `< 0`, `None` otherwise
pub fn find_negative<T>(mat: MatRef<T>) -> Option<(usize, usize)>
where
    T: Float,
{
    for i in 0..mat.nrows() {
        for j in 0..mat.ncols() {
            if mat[(i, j)] < T::zero() {
                return Some((i, j));
            }
        }
    }
    None
}

/// Pairwise Euclidean distances between all rows
///
/// Used by the clustering quality metrics; rows are processed in parallel.
///
/// ### Params
///
/// * `rows` - The points, one per row
///
/// ### Returns
///
/// Full (n x n) distance table as nested vectors
pub fn pairwise_euclidean<T>(rows: &[Vec<T>]) -> Vec<Vec<T>>
where
    T: Float + Send + Sync + Sum,
{
    rows.par_iter()
        .map(|a| rows.iter().map(|b| euclidean(a, b)).collect())
        .collect()
}

///////////
// Tests //
///////////

#[cfg(test)]
mod test_math {
    use super::*;
    use approx::assert_relative_eq;

    fn mat(rows: &[&[f64]]) -> Mat<f64> {
        Mat::from_fn(rows.len(), rows[0].len(), |i, j| rows[i][j])
    }

    #[test]
    fn test_squared_euclidean() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert_relative_eq!(squared_euclidean(&a, &b), 25.0);
        assert_relative_eq!(euclidean(&a, &b), 5.0);
    }

    #[test]
    #[should_panic(expected = "Vectors have different lengths")]
    fn test_squared_euclidean_len_mismatch() {
        squared_euclidean(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn test_row_sums_and_mean() {
        let m = mat(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(row_sums(m.as_ref()), vec![3.0, 7.0]);
        assert_relative_eq!(mat_mean(m.as_ref()), 2.5);
    }

    #[test]
    fn test_matmul_and_gram() {
        let a = mat(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let b = mat(&[&[1.0, 0.0], &[0.0, 1.0]]);
        let p = matmul(a.as_ref(), b.as_ref());
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(p[(i, j)], a[(i, j)]);
            }
        }

        // a^T a = [[35, 44], [44, 56]]
        let g = gram(a.as_ref());
        assert_relative_eq!(g[(0, 0)], 35.0);
        assert_relative_eq!(g[(0, 1)], 44.0);
        assert_relative_eq!(g[(1, 0)], 44.0);
        assert_relative_eq!(g[(1, 1)], 56.0);
    }

    #[test]
    fn test_frobenius_sq_diff() {
        let a = mat(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = mat(&[&[1.0, 0.0], &[3.0, 5.0]]);
        assert_relative_eq!(frobenius_sq_diff(a.as_ref(), b.as_ref()), 5.0);
        assert_relative_eq!(frobenius_sq_diff(a.as_ref(), a.as_ref()), 0.0);
    }

    #[test]
    fn test_find_non_finite_and_negative() {
        let m = mat(&[&[1.0, f64::NAN], &[-1.0, 0.0]]);
        assert_eq!(find_non_finite(m.as_ref()), Some((0, 1)));
        assert_eq!(find_negative(m.as_ref()), Some((1, 0)));

        let ok = mat(&[&[0.0, 1.0]]);
        assert_eq!(find_non_finite(ok.as_ref()), None);
        assert_eq!(find_negative(ok.as_ref()), None);
    }

    #[test]
    fn test_pairwise_euclidean() {
        let rows = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
        let d = pairwise_euclidean(&rows);
        assert_relative_eq!(d[0][1], 5.0);
        assert_relative_eq!(d[1][0], 5.0);
        assert_relative_eq!(d[0][0], 0.0);
    }
}
