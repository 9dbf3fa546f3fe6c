use faer::{Mat, MatRef};
use num_traits::Float;

use crate::error::{Result, SymNmfError};

/////////////////////
// Data structures //
/////////////////////

/// Convert nested rows into a dense matrix
///
/// The nested representation is the boundary format of the public API
/// (row-major, rectangular).
///
/// ### Params
///
/// * `rows` - Slice of rows; every row must have the same length
///
/// ### Returns
///
/// The matrix of shape `(rows.len(), rows[0].len())`. An empty slice gives
/// an empty `0 x 0` matrix; ragged rows are an `InvalidInput` error.
pub fn rows_to_mat<T>(rows: &[Vec<T>]) -> Result<Mat<T>>
where
    T: Float,
{
    let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);

    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(SymNmfError::invalid(format!(
            "Row {} has {} entries, expected {}",
            idx,
            row.len(),
            n_cols
        )));
    }

    Ok(Mat::from_fn(rows.len(), n_cols, |i, j| rows[i][j]))
}

/// Convert a dense matrix into nested rows
///
/// ### Params
///
/// * `mat` - The matrix
///
/// ### Returns
///
/// `Vec` of rows, each a `Vec` of length `mat.ncols()`
pub fn mat_to_rows<T>(mat: MatRef<T>) -> Vec<Vec<T>>
where
    T: Float,
{
    (0..mat.nrows())
        .map(|i| (0..mat.ncols()).map(|j| mat[(i, j)]).collect())
        .collect()
}

///////////
// Tests //
///////////

#[cfg(test)]
mod test_structures {
    use super::*;

    #[test]
    fn test_rows_to_mat_and_back() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let mat = rows_to_mat(&rows).unwrap();
        assert_eq!(mat.nrows(), 2);
        assert_eq!(mat.ncols(), 3);
        assert_eq!(mat[(1, 2)], 6.0);
        assert_eq!(mat_to_rows(mat.as_ref()), rows);
    }

    #[test]
    fn test_rows_to_mat_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = rows_to_mat(&rows).unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidInput(_)));
    }

    #[test]
    fn test_rows_to_mat_empty() {
        let rows: Vec<Vec<f64>> = Vec::new();
        let mat = rows_to_mat(&rows).unwrap();
        assert_eq!(mat.nrows(), 0);
        assert_eq!(mat.ncols(), 0);
    }
}
