use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by sparse matrix assembly and format checks.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Data is not sorted by row index within each column
    #[error("Data is not sorted by row index within each column")]
    BadRowOrdering,
    #[error("Row value is negative or exceeds the matrix row dimension")]
    /// Row value is negative or exceeds the matrix row dimension
    BadRowval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
}

/// Error type returned by the small dense factorization routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Factorization hit a non-positive pivot at the given column
    #[error("Cholesky factorization failed at column {0}")]
    Cholesky(usize),
}
