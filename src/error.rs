use thiserror::Error;

////////////
// Errors //
////////////

/// Errors raised by the SymNMF engine and its orchestration layer
///
/// The three numerical kinds are kept apart so callers can tell bad input
/// from bad maths. File reading errors only come from `data::io`.
#[derive(Error, Debug)]
pub enum SymNmfError {
    /// Malformed dimensions, too few points, `k` out of range or negative
    /// entries where non-negativity is required.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A point has zero similarity to every other point, so its degree is
    /// zero and the normalisation is undefined.
    #[error("Degenerate input: point {index} has zero degree")]
    DegenerateInput { index: usize },

    /// NaN or Inf appeared during the computation.
    #[error("Numeric instability: {0}")]
    NumericInstability(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

impl SymNmfError {
    /// Shorthand for an `InvalidInput` error
    pub fn invalid(msg: impl Into<String>) -> Self {
        SymNmfError::InvalidInput(msg.into())
    }

    /// Shorthand for a `NumericInstability` error
    pub fn unstable(msg: impl Into<String>) -> Self {
        SymNmfError::NumericInstability(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SymNmfError>;
