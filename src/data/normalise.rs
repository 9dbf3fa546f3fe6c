use faer::{Mat, MatRef};
use num_traits::Float;

use crate::error::{Result, SymNmfError};
use crate::{ensure_finite, ensure_square};

///////////////////////////
// Normalised similarity //
///////////////////////////

/// Symmetrically normalise a similarity matrix
///
/// Computes `Wn = D^(-1/2) * W * D^(-1/2)`, i.e.
/// `Wn_ij = W_ij / sqrt(d_i * d_j)`. Isolated points are rejected rather
/// than zeroed out.
///
/// ### Params
///
/// * `w` - Square similarity matrix
/// * `degrees` - Degree of every point, i.e. the diagonal of `D`
///
/// ### Returns
///
/// The normalised similarity matrix
///
/// ### Errors
///
/// * `InvalidInput` - shape mismatch or non-finite entries.
/// * `DegenerateInput` - a degree is exactly zero (first such point is
///   reported).
pub fn normalised_matrix<T>(w: MatRef<T>, degrees: &[T]) -> Result<Mat<T>>
where
    T: Float,
{
    ensure_square!(w, "Similarity matrix");
    ensure_finite!(w, "Similarity matrix");

    let n = w.nrows();
    if degrees.len() != n {
        return Err(SymNmfError::invalid(format!(
            "Got {} degrees for a {} x {} similarity matrix",
            degrees.len(),
            n,
            n
        )));
    }
    if let Some(idx) = degrees.iter().position(|d| !d.is_finite()) {
        return Err(SymNmfError::invalid(format!(
            "Degree of point {} is not finite",
            idx
        )));
    }
    if let Some(index) = degrees.iter().position(|&d| d == T::zero()) {
        return Err(SymNmfError::DegenerateInput { index });
    }

    let d_inv_sqrt: Vec<T> = degrees.iter().map(|&d| d.sqrt().recip()).collect();

    // scale factor first so that Wn_ij and Wn_ji are bit-identical
    Ok(Mat::from_fn(n, n, |i, j| {
        w[(i, j)] * (d_inv_sqrt[i] * d_inv_sqrt[j])
    }))
}

/// Normalise a similarity matrix given its diagonal degree matrix
///
/// ### Params
///
/// * `w` - Square similarity matrix
/// * `d` - Diagonal degree matrix as produced by `degree_matrix`
///
/// ### Returns
///
/// The normalised similarity matrix
pub fn normalised_from_degree_matrix<T>(w: MatRef<T>, d: MatRef<T>) -> Result<Mat<T>>
where
    T: Float,
{
    ensure_square!(d, "Degree matrix");
    let degrees: Vec<T> = (0..d.nrows()).map(|i| d[(i, i)]).collect();
    normalised_matrix(w, &degrees)
}

///////////
// Tests //
///////////

#[cfg(test)]
mod test_normalise {
    use super::*;
    use crate::data::degree::*;
    use crate::data::similarity::similarity_matrix;
    use crate::data::structures::rows_to_mat;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalised_entries() {
        let pts = rows_to_mat(&[vec![0.0], vec![1.0], vec![3.0]]).unwrap();
        let w = similarity_matrix(pts.as_ref()).unwrap();
        let d = degree_vector(w.as_ref()).unwrap();
        let wn = normalised_matrix(w.as_ref(), &d).unwrap();

        for i in 0..3 {
            assert_eq!(wn[(i, i)], 0.0);
            for j in 0..3 {
                let expected = w[(i, j)] / (d[i] * d[j]).sqrt();
                assert_relative_eq!(wn[(i, j)], expected, epsilon = 1e-12);
                assert_eq!(wn[(i, j)], wn[(j, i)]);
            }
        }
    }

    #[test]
    fn test_normalised_from_degree_matrix_agrees() {
        let pts = rows_to_mat(&[vec![0.0, 1.0], vec![1.0, 1.0], vec![2.0, -1.0]]).unwrap();
        let w = similarity_matrix(pts.as_ref()).unwrap();
        let d_vec = degree_vector(w.as_ref()).unwrap();
        let d_mat = degree_matrix(w.as_ref()).unwrap();

        let a = normalised_matrix(w.as_ref(), &d_vec).unwrap();
        let b = normalised_from_degree_matrix(w.as_ref(), d_mat.as_ref()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(a[(i, j)], b[(i, j)]);
            }
        }
    }

    #[test]
    fn test_isolated_point_is_degenerate() {
        // squared distance of 10_000 underflows exp(-5_000) to exactly zero
        let pts = rows_to_mat(&[vec![0.0, 0.0], vec![0.0, 1.0], vec![100.0, 0.0]]).unwrap();
        let w = similarity_matrix(pts.as_ref()).unwrap();
        let d = degree_vector(w.as_ref()).unwrap();
        assert_eq!(d[2], 0.0);

        let err = normalised_matrix(w.as_ref(), &d).unwrap_err();
        assert!(matches!(err, SymNmfError::DegenerateInput { index: 2 }));
    }

    #[test]
    fn test_degree_length_mismatch() {
        let w = Mat::from_fn(3, 3, |i, j| if i == j { 0.0 } else { 0.5 });
        let err = normalised_matrix(w.as_ref(), &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidInput(_)));
    }
}
