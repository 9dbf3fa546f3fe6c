///////////////////
// Vector macros //
///////////////////

/// Assertion that all vectors have the same length.
#[macro_export]
macro_rules! assert_same_len {
    ($($vec:expr),+ $(,)?) => {
        {
            let lengths: Vec<usize> = vec![$($vec.len()),+];
            let first_len = lengths[0];

            if !lengths.iter().all(|&len| len == first_len) {
                panic!(
                    "Vectors have different lengths: {:?}",
                    lengths
                );
            }
        }
    };
}

///////////////////
// Matrix macros //
///////////////////

/// Early return with an `InvalidInput` error if the matrix is not square.
#[macro_export]
macro_rules! ensure_square {
    ($mat:expr, $name:expr) => {
        if $mat.nrows() != $mat.ncols() {
            return Err($crate::error::SymNmfError::invalid(format!(
                "{} must be square, got {} x {}",
                $name,
                $mat.nrows(),
                $mat.ncols()
            )));
        }
    };
}

/// Early return with an `InvalidInput` error if any entry of the matrix is
/// NaN or infinite.
#[macro_export]
macro_rules! ensure_finite {
    ($mat:expr, $name:expr) => {
        if let Some((i, j)) = $crate::utils::math::find_non_finite($mat) {
            return Err($crate::error::SymNmfError::invalid(format!(
                "{} contains a non-finite entry at ({}, {})",
                $name, i, j
            )));
        }
    };
}
