//! Reading comma-separated point files and printing matrices in the fixed
//! 4-decimal format used by the command line interface.

use faer::{Mat, MatRef};
use num_traits::{Float, ToPrimitive};
use std::fs;
use std::path::Path;

use crate::data::structures::*;
use crate::error::{Result, SymNmfError};

/////////////
// Reading //
/////////////

/// Parse comma-separated points
///
/// One point per non-empty line; coordinates are separated by commas and may
/// be padded with whitespace.
///
/// ### Params
///
/// * `content` - The file content
///
/// ### Returns
///
/// Matrix of shape (n_points x n_dim)
pub fn parse_points(content: &str) -> Result<Mat<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(|tok| {
                tok.trim().parse::<f64>().map_err(|e| SymNmfError::Parse {
                    line: line_idx + 1,
                    msg: format!("'{}': {}", tok.trim(), e),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SymNmfError::invalid("No points found"));
    }

    rows_to_mat(&rows)
}

/// Read points from a comma-separated file
///
/// ### Params
///
/// * `path` - Path to the file
///
/// ### Returns
///
/// Matrix of shape (n_points x n_dim)
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Mat<f64>> {
    let content = fs::read_to_string(path)?;
    parse_points(&content)
}

//////////////
// Printing //
//////////////

/// Format a matrix with 4 decimals, comma separated, one row per line
///
/// ### Params
///
/// * `mat` - The matrix to format
///
/// ### Returns
///
/// The formatted string; every row is terminated by a newline
pub fn format_matrix<T>(mat: MatRef<T>) -> String
where
    T: Float + ToPrimitive,
{
    let mut out = String::new();
    for i in 0..mat.nrows() {
        let row: Vec<String> = (0..mat.ncols())
            .map(|j| format!("{:.4}", mat[(i, j)].to_f64().unwrap_or(f64::NAN)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

///////////
// Tests //
///////////

#[cfg(test)]
mod test_io {
    use super::*;

    #[test]
    fn test_parse_points() {
        let content = "1.0,2.0\n 3.5 , -4\n\n5,6\n";
        let mat = parse_points(content).unwrap();
        assert_eq!(mat.nrows(), 3);
        assert_eq!(mat.ncols(), 2);
        assert_eq!(mat[(1, 0)], 3.5);
        assert_eq!(mat[(1, 1)], -4.0);
        assert_eq!(mat[(2, 1)], 6.0);
    }

    #[test]
    fn test_parse_points_no_trailing_newline() {
        let mat = parse_points("1,2,3\n4,5,6").unwrap();
        assert_eq!(mat.nrows(), 2);
        assert_eq!(mat.ncols(), 3);
    }

    #[test]
    fn test_parse_points_bad_token() {
        let err = parse_points("1,2\n3,abc\n").unwrap_err();
        assert!(matches!(err, SymNmfError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_points_ragged() {
        let err = parse_points("1,2\n3\n").unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_points_empty() {
        let err = parse_points("\n\n").unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidInput(_)));
    }

    #[test]
    fn test_read_points_missing_file() {
        let err = read_points("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, SymNmfError::Io(_)));
    }

    #[test]
    fn test_format_matrix() {
        let mat = Mat::from_fn(2, 2, |i, j| (i * 2 + j) as f64 / 3.0);
        assert_eq!(format_matrix(mat.as_ref()), "0.0000,0.3333\n0.6667,1.0000\n");
    }
}
